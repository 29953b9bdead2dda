//! Entity factories
//!
//! Spawn sites ask for a kind and get back a fully-defaulted entity. Position,
//! id and velocity are assigned by the caller when the entity is placed.

use glam::Vec2;

use super::entity::{Block, BlockKind, Enemy, EnemyBehavior, EnemyKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// Builds blocks
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFactory;

impl BlockFactory {
    pub fn create(&self, kind: BlockKind) -> Block {
        let size = match kind {
            BlockKind::Normal => BLOCK_SIZE,
            BlockKind::PowerUp => POWER_UP_SIZE,
        };
        Block {
            id: 0,
            kind,
            pos: Vec2::ZERO,
            size: Vec2::new(size.0, size.1),
            vel: Vec2::ZERO,
        }
    }
}

/// Builds enemies with the tuned fire cadence and wobble
#[derive(Debug, Clone, Copy)]
pub struct EnemyFactory {
    pub shoot_interval: f32,
    pub amplitude: f32,
    pub frequency: f32,
    /// Lowest y a flying enemy may wobble to
    pub max_y: f32,
}

impl Default for EnemyFactory {
    fn default() -> Self {
        Self {
            shoot_interval: SHOOT_TIME,
            amplitude: OSCILLATION_AMPLITUDE,
            frequency: OSCILLATION_FREQUENCY,
            max_y: WINDOW_HEIGHT - LEVEL_GROUND,
        }
    }
}

impl EnemyFactory {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            shoot_interval: tuning.shoot_time,
            amplitude: tuning.oscillation_amplitude,
            frequency: tuning.oscillation_frequency,
            max_y: tuning.max_y(),
        }
    }

    pub fn create(&self, kind: EnemyKind) -> Enemy {
        let behavior = match kind {
            EnemyKind::Stationary => EnemyBehavior::Stationary,
            EnemyKind::Shooting => EnemyBehavior::Shooting {
                fire_timer: self.shoot_interval,
                interval: self.shoot_interval,
            },
            EnemyKind::Flying => EnemyBehavior::Flying {
                base_y: 0.0,
                phase: 0.0,
                amplitude: self.amplitude,
                frequency: self.frequency,
                max_y: self.max_y,
            },
        };
        Enemy {
            id: 0,
            kind,
            pos: Vec2::ZERO,
            size: Vec2::new(ENEMY_SIZE.0, ENEMY_SIZE.1),
            vel: Vec2::ZERO,
            behavior,
        }
    }
}
