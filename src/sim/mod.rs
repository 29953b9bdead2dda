//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, file or platform dependencies

pub mod bounds;
pub mod entity;
pub mod factory;
pub mod state;
pub mod tick;

pub use bounds::{Rect, intersects};
pub use entity::{
    Block, BlockKind, Bullet, BulletOwner, Color, Enemy, EnemyBehavior, EnemyKind, Entity, Player,
    Viewport,
};
pub use factory::{BlockFactory, EnemyFactory};
pub use state::{GameEvent, GamePhase, GameState, Hazard, SpawnKind};
pub use tick::{TickInput, tick};
