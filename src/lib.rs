//! Scroll Runner - A side-scrolling dodge-and-shoot game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, difficulty)
//! - `tuning`: Data-driven game balance
//! - `assets`: Texture loading seam (the simulation only sees loaded handles)
//! - `render`: Draw-list extraction for whatever renderer hosts the game

pub mod assets;
pub mod render;
pub mod sim;
pub mod tuning;

pub use assets::{AssetError, FsTextureLoader, Texture, TextureLoader};
pub use render::{DrawItem, DrawSink, TextCanvas, Visual, draw_list};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport dimensions
    pub const WINDOW_WIDTH: f32 = 1280.0;
    pub const WINDOW_HEIGHT: f32 = 720.0;
    /// Strip at the bottom of the window the player can't enter
    pub const LEVEL_GROUND: f32 = 63.0;

    /// Per-frame speeds are authored against this many frames per second
    pub const MOTION_RATE: f32 = 240.0;
    /// Scroll speed (x) for blocks/enemies, vertical player speed (y), per frame
    pub const MOVE_SPEED: (f32, f32) = (0.7, 0.8);
    /// Bullet speed per frame
    pub const BULLET_SPEED: f32 = 1.7;
    pub const BULLET_RADIUS: f32 = 10.0;

    /// Seconds between shots of a shooting enemy
    pub const SHOOT_TIME: f32 = 1.3;
    /// Seconds between player shots
    pub const PLAYER_FIRE_COOLDOWN: f32 = 0.25;
    /// Seconds of immunity after the player is hit
    pub const HIT_COOLDOWN: f32 = 1.0;

    /// Spawns per second at t=0 (never above `MAX_INITIAL_SPAWN_RATE`)
    pub const INITIAL_SPAWN_RATE: f32 = 1.2;
    pub const MAX_INITIAL_SPAWN_RATE: f32 = 1.4;
    /// Added to the spawn rate every escalation interval
    pub const RATE_INCREASER: f32 = 0.120;
    /// Added to the speed multiplier every escalation interval
    pub const SPEED_INCREASER: f32 = 0.1;
    /// Seconds between escalation steps
    pub const ESCALATION_INTERVAL: f32 = 10.0;

    /// Entity sizes
    pub const PLAYER_SIZE: (f32, f32) = (56.0, 63.0);
    pub const BLOCK_SIZE: (f32, f32) = (50.0, 50.0);
    pub const POWER_UP_SIZE: (f32, f32) = (36.0, 36.0);
    pub const ENEMY_SIZE: (f32, f32) = (60.0, 52.0);

    /// Flying enemy vertical wobble
    pub const OSCILLATION_AMPLITUDE: f32 = 60.0;
    pub const OSCILLATION_FREQUENCY: f32 = 2.5; // radians per second
}
