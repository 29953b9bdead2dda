//! Entity models: the player, scrolling blocks, enemies and bullets
//!
//! Everything except the player implements [`Entity`], the capability set the
//! tick pipeline needs: a bound rectangle, per-tick motion and a cull test.
//! Positions are top-left corners in screen space (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bounds::Rect;
use crate::assets::Texture;
use crate::consts::*;

/// Logical play area used by the cull step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
        }
    }
}

/// Shared behaviour of everything that scrolls through the viewport
pub trait Entity {
    fn id(&self) -> u32;

    /// Current bound rectangle
    fn bounds(&self) -> Rect;

    /// Move by velocity * dt (plus any kind-specific motion)
    fn advance(&mut self, dt: f32);

    /// Whether the entity has left the logical viewport on its travel side
    fn is_out_of_bounds(&self, viewport: &Viewport) -> bool;
}

/// Leftward movers die past x=0, rightward movers past the right edge
#[inline]
fn past_travel_edge(x: f32, vel_x: f32, viewport: &Viewport) -> bool {
    if vel_x > 0.0 { x > viewport.width } else { x < 0.0 }
}

/// RGBA fill color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(220, 30, 30);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Sprite supplied by the host; bounds fall back to `hitbox` without one
    pub texture: Option<Texture>,
    pub hitbox: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(80.0, 0.0),
            texture: None,
            hitbox: Vec2::new(PLAYER_SIZE.0, PLAYER_SIZE.1),
        }
    }
}

impl Player {
    pub fn set_texture(&mut self, texture: Texture) {
        self.texture = Some(texture);
    }

    /// Size used for collisions
    pub fn size(&self) -> Vec2 {
        match &self.texture {
            Some(tex) => tex.size(),
            None => self.hitbox,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size())
    }

    /// Place the player, keeping y inside [0, max_y]
    pub fn set_position(&mut self, x: f32, y: f32, max_y: f32) {
        self.pos = Vec2::new(x, y.clamp(0.0, max_y.max(0.0)));
    }

    /// Move vertically by `delta`, clamped to [0, max_y]
    pub fn move_vertical(&mut self, delta: f32, max_y: f32) {
        self.pos.y = (self.pos.y + delta).clamp(0.0, max_y.max(0.0));
    }
}

/// Block types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlockKind {
    /// Obstacle; touching it hurts
    #[default]
    Normal,
    /// Pickup; consumed on contact
    PowerUp,
}

/// A scrolling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub kind: BlockKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
}

impl Entity for Block {
    fn id(&self) -> u32 {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    fn is_out_of_bounds(&self, viewport: &Viewport) -> bool {
        past_travel_edge(self.pos.x, self.vel.x, viewport)
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Stationary,
    Shooting,
    Flying,
}

/// Kind-specific enemy state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Drifts with the scroll, nothing else
    Stationary,
    /// Fires a bullet every `interval` seconds
    Shooting { fire_timer: f32, interval: f32 },
    /// Sine wobble around `base_y`, kept inside [0, max_y]
    Flying {
        base_y: f32,
        phase: f32,
        amplitude: f32,
        frequency: f32,
        max_y: f32,
    },
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub behavior: EnemyBehavior,
}

impl Enemy {
    /// Move to `pos`; a flying enemy re-centres its wobble there
    pub fn place(&mut self, pos: Vec2) {
        self.pos = pos;
        if let EnemyBehavior::Flying {
            ref mut base_y,
            ref mut phase,
            ..
        } = self.behavior
        {
            *base_y = pos.y;
            *phase = 0.0;
        }
    }

    /// Count down the fire timer. Returns true (and rewinds) when a shot is due.
    pub fn tick_fire_timer(&mut self, dt: f32) -> bool {
        match self.behavior {
            EnemyBehavior::Shooting {
                ref mut fire_timer,
                interval,
            } => {
                *fire_timer -= dt;
                if *fire_timer <= 0.0 {
                    // Carry the overshoot so the cadence doesn't drift
                    *fire_timer = (*fire_timer + interval).max(0.0);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Where bullets leave the enemy: its left edge, vertically centred
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y + self.size.y * 0.5)
    }

    pub fn is_flying(&self) -> bool {
        matches!(self.behavior, EnemyBehavior::Flying { .. })
    }

    pub fn is_shooting(&self) -> bool {
        matches!(self.behavior, EnemyBehavior::Shooting { .. })
    }
}

impl Entity for Enemy {
    fn id(&self) -> u32 {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    fn advance(&mut self, dt: f32) {
        self.pos.x += self.vel.x * dt;
        match self.behavior {
            EnemyBehavior::Flying {
                base_y,
                ref mut phase,
                amplitude,
                frequency,
                max_y,
            } => {
                *phase = (*phase + frequency * dt) % std::f32::consts::TAU;
                self.pos.y = (base_y + amplitude * phase.sin()).clamp(0.0, max_y.max(0.0));
            }
            _ => {
                self.pos.y += self.vel.y * dt;
            }
        }
    }

    fn is_out_of_bounds(&self, viewport: &Viewport) -> bool {
        past_travel_edge(self.pos.x, self.vel.x, viewport)
    }
}

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A round projectile. `pos` is the top-left of its bounding square.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    pub owner: BulletOwner,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
}

impl Default for Bullet {
    /// A motionless player bullet at the origin
    fn default() -> Self {
        Self {
            id: 0,
            owner: BulletOwner::Player,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: BULLET_RADIUS,
            color: Color::BLACK,
        }
    }
}

impl Bullet {
    /// Player bullet centred on `center`, travelling right at `speed`
    pub fn player(id: u32, center: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos: center - Vec2::splat(BULLET_RADIUS),
            vel: Vec2::new(speed, 0.0),
            ..Default::default()
        }
    }

    /// Enemy bullet centred on `center`, travelling left at `speed`
    pub fn enemy(id: u32, center: Vec2, speed: f32) -> Self {
        Self {
            id,
            owner: BulletOwner::Enemy,
            pos: center - Vec2::splat(BULLET_RADIUS),
            vel: Vec2::new(-speed, 0.0),
            radius: BULLET_RADIUS,
            color: Color::RED,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }
}

impl Entity for Bullet {
    fn id(&self) -> u32 {
        self.id
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.radius * 2.0))
    }

    fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    fn is_out_of_bounds(&self, viewport: &Viewport) -> bool {
        past_travel_edge(self.pos.x, self.vel.x, viewport)
    }
}
