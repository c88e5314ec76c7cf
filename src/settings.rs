//! Simulation tuning
//!
//! Every timing and geometry knob the simulation reads lives here so that a
//! run can be reproduced from a JSON file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a configuration is rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("arena must be larger than the player ({width}x{height} vs {player})")]
    ArenaTooSmall { width: f32, height: f32, player: f32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub player_size: f32,
    pub pad_size: f32,
    /// Units per tick
    pub player_speed: f32,
    /// Milliseconds
    pub cooldown_ms: f64,
    pub proximity: f32,
    pub distance_noise_threshold: f32,
    pub effect_lifetime_ms: f64,
    pub arrive_delay_ms: f64,
    pub settle_delay_ms: f64,
    pub marker_clear_delay_ms: f64,
    /// Scale the combined keyboard vector to unit length before applying speed.
    /// Off by default: holding two keys moves diagonally faster.
    pub normalize_diagonal: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            player_size: PLAYER_SIZE,
            pad_size: PAD_SIZE,
            player_speed: PLAYER_SPEED,
            cooldown_ms: COOLDOWN_MS,
            proximity: TELEPORT_PROXIMITY,
            distance_noise_threshold: DISTANCE_NOISE_THRESHOLD,
            effect_lifetime_ms: EFFECT_LIFETIME_MS,
            arrive_delay_ms: ARRIVE_DELAY_MS,
            settle_delay_ms: SETTLE_DELAY_MS,
            marker_clear_delay_ms: MARKER_CLEAR_DELAY_MS,
            normalize_diagonal: false,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("player_size", self.player_size as f64),
            ("pad_size", self.pad_size as f64),
            ("proximity", self.proximity as f64),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if self.arena_width <= self.player_size || self.arena_height <= self.player_size {
            return Err(ConfigError::ArenaTooSmall {
                width: self.arena_width,
                height: self.arena_height,
                player: self.player_size,
            });
        }
        for (field, value) in [
            ("player_speed", self.player_speed as f64),
            ("cooldown_ms", self.cooldown_ms),
            ("distance_noise_threshold", self.distance_noise_threshold as f64),
            ("effect_lifetime_ms", self.effect_lifetime_ms),
            ("arrive_delay_ms", self.arrive_delay_ms),
            ("settle_delay_ms", self.settle_delay_ms),
            ("marker_clear_delay_ms", self.marker_clear_delay_ms),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// Largest legal top-left corner for the player
    pub fn max_player_x(&self) -> f32 {
        self.arena_width - self.player_size
    }

    pub fn max_player_y(&self) -> f32 {
        self.arena_height - self.player_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_player_x(), 772.0);
        assert_eq!(config.max_player_y(), 472.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "cooldown_ms": 1000.0 }"#).unwrap();
        assert_eq!(config.cooldown_ms, 1000.0);
        assert_eq!(config.arena_width, ARENA_WIDTH);
        assert!(!config.normalize_diagonal);
    }

    #[test]
    fn test_rejects_tiny_arena() {
        let err = SimConfig::from_json(r#"{ "arena_width": 20.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ArenaTooSmall { .. }));
    }

    #[test]
    fn test_rejects_negative_delay() {
        let err = SimConfig::from_json(r#"{ "settle_delay_ms": -1.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Negative { field: "settle_delay_ms", .. }));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            SimConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
