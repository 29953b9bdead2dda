//! Data-driven game balance
//!
//! Every number the simulation reads comes from a `Tuning`. Defaults match
//! `crate::consts`; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Viewport;

/// Tuning load/validation errors
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },
}

/// Relative odds of each spawn outcome
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    pub normal_block: u32,
    pub power_up: u32,
    pub stationary_enemy: u32,
    pub shooting_enemy: u32,
    pub flying_enemy: u32,
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            normal_block: 40,
            power_up: 10,
            stationary_enemy: 20,
            shooting_enemy: 15,
            flying_enemy: 15,
        }
    }
}

impl SpawnWeights {
    /// Sum of all weights, `None` if it doesn't fit in a `u32`
    pub fn total(&self) -> Option<u32> {
        self.normal_block
            .checked_add(self.power_up)?
            .checked_add(self.stationary_enemy)?
            .checked_add(self.shooting_enemy)?
            .checked_add(self.flying_enemy)
    }
}

/// Construction-time game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub window_width: f32,
    pub window_height: f32,
    /// Bottom strip the player can't move into
    pub level_ground: f32,

    /// Frames per second the per-frame speeds below are authored against
    pub motion_rate: f32,
    /// (scroll speed, player vertical speed), per frame
    pub move_speed: (f32, f32),
    /// Bullet speed, per frame
    pub bullet_speed: f32,

    /// Seconds between shooting-enemy shots
    pub shoot_time: f32,
    pub player_fire_cooldown: f32,
    pub hit_cooldown: f32,

    /// Spawns per second at t=0
    pub initial_spawn_rate: f32,
    pub rate_increaser: f32,
    pub speed_increaser: f32,
    /// Seconds between escalation steps
    pub escalation_interval: f32,
    /// `None` leaves escalation uncapped
    pub max_spawn_rate: Option<f32>,
    pub max_speed_multiplier: Option<f32>,

    pub oscillation_amplitude: f32,
    pub oscillation_frequency: f32,
    pub spawn_weights: SpawnWeights,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            window_width: WINDOW_WIDTH,
            window_height: WINDOW_HEIGHT,
            level_ground: LEVEL_GROUND,
            motion_rate: MOTION_RATE,
            move_speed: MOVE_SPEED,
            bullet_speed: BULLET_SPEED,
            shoot_time: SHOOT_TIME,
            player_fire_cooldown: PLAYER_FIRE_COOLDOWN,
            hit_cooldown: HIT_COOLDOWN,
            initial_spawn_rate: INITIAL_SPAWN_RATE,
            rate_increaser: RATE_INCREASER,
            speed_increaser: SPEED_INCREASER,
            escalation_interval: ESCALATION_INTERVAL,
            max_spawn_rate: None,
            max_speed_multiplier: None,
            oscillation_amplitude: OSCILLATION_AMPLITUDE,
            oscillation_frequency: OSCILLATION_FREQUENCY,
            spawn_weights: SpawnWeights::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(TuningError::OutOfRange { field, value })
            }
        }

        positive("window_width", self.window_width)?;
        positive("window_height", self.window_height)?;
        positive("motion_rate", self.motion_rate)?;
        positive("move_speed.0", self.move_speed.0)?;
        positive("move_speed.1", self.move_speed.1)?;
        positive("bullet_speed", self.bullet_speed)?;
        positive("shoot_time", self.shoot_time)?;
        positive("escalation_interval", self.escalation_interval)?;
        positive("initial_spawn_rate", self.initial_spawn_rate)?;

        if self.initial_spawn_rate > MAX_INITIAL_SPAWN_RATE {
            return Err(TuningError::OutOfRange {
                field: "initial_spawn_rate",
                value: self.initial_spawn_rate,
            });
        }
        if !(0.0..self.window_height).contains(&self.level_ground) {
            return Err(TuningError::OutOfRange {
                field: "level_ground",
                value: self.level_ground,
            });
        }
        for (field, value) in [
            ("rate_increaser", self.rate_increaser),
            ("speed_increaser", self.speed_increaser),
            ("player_fire_cooldown", self.player_fire_cooldown),
            ("hit_cooldown", self.hit_cooldown),
            ("oscillation_amplitude", self.oscillation_amplitude),
            ("oscillation_frequency", self.oscillation_frequency),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(TuningError::OutOfRange { field, value });
            }
        }
        if let Some(cap) = self.max_spawn_rate {
            if cap < self.initial_spawn_rate {
                return Err(TuningError::OutOfRange {
                    field: "max_spawn_rate",
                    value: cap,
                });
            }
        }
        if let Some(cap) = self.max_speed_multiplier {
            if cap < 1.0 {
                return Err(TuningError::OutOfRange {
                    field: "max_speed_multiplier",
                    value: cap,
                });
            }
        }
        match self.spawn_weights.total() {
            Some(total) if total > 0 => {}
            Some(_) => {
                return Err(TuningError::OutOfRange {
                    field: "spawn_weights",
                    value: 0.0,
                });
            }
            None => {
                return Err(TuningError::OutOfRange {
                    field: "spawn_weights",
                    value: u32::MAX as f32,
                });
            }
        }
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.window_width,
            height: self.window_height,
        }
    }

    /// Largest top-edge y for the player and for spawns
    pub fn max_y(&self) -> f32 {
        self.window_height - self.level_ground
    }

    /// Leftward scroll speed in units/second (before the speed multiplier)
    pub fn scroll_speed(&self) -> f32 {
        self.move_speed.0 * self.motion_rate
    }

    /// Vertical player speed in units/second
    pub fn player_speed(&self) -> f32 {
        self.move_speed.1 * self.motion_rate
    }

    /// Bullet speed in units/second
    pub fn bullet_velocity(&self) -> f32 {
        self.bullet_speed * self.motion_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let tuning = Tuning::default();
        assert_eq!(tuning.bullet_speed, 1.7);
        assert_eq!(tuning.level_ground, 63.0);
        assert_eq!(tuning.shoot_time, 1.3);
        assert_eq!(tuning.rate_increaser, 0.120);
        assert_eq!(tuning.speed_increaser, 0.1);
        assert_eq!(tuning.move_speed, (0.7, 0.8));
        assert!(tuning.initial_spawn_rate <= 1.4);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "bullet_speed": 2.5, "max_spawn_rate": 3.0 }"#)
            .expect("valid tuning");
        assert_eq!(tuning.bullet_speed, 2.5);
        assert_eq!(tuning.max_spawn_rate, Some(3.0));
        assert_eq!(tuning.shoot_time, SHOOT_TIME);
        assert_eq!(tuning.spawn_weights, SpawnWeights::default());
    }

    #[test]
    fn test_rejects_fast_initial_spawn_rate() {
        let err = Tuning::from_json(r#"{ "initial_spawn_rate": 2.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "initial_spawn_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_example_config_is_valid() {
        let tuning = Tuning::from_json(include_str!("../config/tuning.example.json"))
            .expect("example config parses");
        assert_eq!(tuning.max_spawn_rate, Some(4.0));
        assert_eq!(tuning.max_speed_multiplier, None);
    }

    #[test]
    fn test_overflowing_spawn_weights_rejected() {
        let err = Tuning::from_json(
            r#"{ "spawn_weights": { "normal_block": 4294967295, "power_up": 1 } }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "spawn_weights",
                ..
            }
        ));
        assert_eq!(SpawnWeights::default().total(), Some(100));
    }

    #[test]
    fn test_zero_spawn_weights_rejected() {
        let json = r#"{ "spawn_weights": { "normal_block": 0, "power_up": 0,
            "stationary_enemy": 0, "shooting_enemy": 0, "flying_enemy": 0 } }"#;
        let err = Tuning::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            TuningError::OutOfRange {
                field: "spawn_weights",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here/tuning.json").unwrap_err();
        assert!(matches!(err, TuningError::Io(_)));
    }

    #[test]
    fn test_derived_speeds() {
        let tuning = Tuning::default();
        assert!((tuning.scroll_speed() - 168.0).abs() < 1e-3);
        assert!((tuning.player_speed() - 192.0).abs() < 1e-3);
        assert!((tuning.bullet_velocity() - 408.0).abs() < 1e-3);
        assert_eq!(tuning.max_y(), WINDOW_HEIGHT - LEVEL_GROUND);
    }
}
