//! Game configuration
//!
//! One immutable struct holding every tunable the simulation reads. It is
//! built once (defaults or a JSON document) and passed by reference into the
//! sim; nothing in the sim mutates it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating a [`GameConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How many pipes to spawn when several pass the bird on the same tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnPolicy {
    /// One spawn per tick no matter how many pipes passed
    PerTick,
    /// One spawn per pipe that passed; extras are staggered by a pipe width
    #[default]
    PerPass,
}

impl SpawnPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "per_tick" | "pertick" | "tick" => Some(SpawnPolicy::PerTick),
            "per_pass" | "perpass" | "pass" => Some(SpawnPolicy::PerPass),
            _ => None,
        }
    }

    /// Number of spawns owed for `passed` pipes crossing the bird this tick
    pub fn spawn_count(&self, passed: usize) -> usize {
        match self {
            SpawnPolicy::PerTick => passed.min(1),
            SpawnPolicy::PerPass => passed,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Window ===
    pub window_width: i32,
    pub window_height: i32,
    /// Floor y coordinate (top of the ground strip)
    pub floor: i32,
    /// Simulation ticks per second
    pub tick_rate: u32,

    // === Bird ===
    pub bird_x: i32,
    pub bird_y: f64,
    pub jump_velocity: f64,
    pub gravity: f64,
    pub terminal_displacement: f64,
    pub rise_bias: f64,
    pub max_rotation: f64,
    pub min_rotation: f64,
    pub rotation_velocity: f64,
    pub tilt_hold_distance: f64,
    pub animation_ticks: u32,

    // === Pipes ===
    pub pipe_gap: i32,
    pub pipe_velocity: f32,
    pub pipe_height_min: i32,
    pub pipe_height_max: i32,
    pub first_pipe_x: f32,
    pub spawn_policy: SpawnPolicy,

    // === Ground ===
    pub ground_velocity: f32,
    pub ground_tile_width: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: WIN_WIDTH,
            window_height: WIN_HEIGHT,
            floor: FLOOR,
            tick_rate: TICK_RATE,

            bird_x: BIRD_X,
            bird_y: BIRD_Y,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            terminal_displacement: TERMINAL_DISPLACEMENT,
            rise_bias: RISE_BIAS,
            max_rotation: MAX_ROTATION,
            min_rotation: MIN_ROTATION,
            rotation_velocity: ROTATION_VELOCITY,
            tilt_hold_distance: TILT_HOLD_DISTANCE,
            animation_ticks: ANIMATION_TICKS,

            pipe_gap: PIPE_GAP,
            pipe_velocity: PIPE_VELOCITY,
            pipe_height_min: PIPE_HEIGHT_MIN,
            pipe_height_max: PIPE_HEIGHT_MAX,
            first_pipe_x: FIRST_PIPE_X,
            spawn_policy: SpawnPolicy::default(),

            ground_velocity: GROUND_VELOCITY,
            ground_tile_width: GROUND_TILE_WIDTH,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// X coordinate where replacement pipes appear (the right window edge)
    pub fn spawn_x(&self) -> f32 {
        self.window_width as f32
    }

    /// Duration of one tick in seconds
    pub fn tick_seconds(&self) -> f64 {
        1.0 / self.tick_rate as f64
    }

    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if self.window_width <= 0 || self.window_height <= 0 {
            return fail(format!(
                "window must be non-empty, got {}x{}",
                self.window_width, self.window_height
            ));
        }
        if self.floor <= 0 || self.floor > self.window_height {
            return fail(format!("floor {} outside window", self.floor));
        }
        if self.tick_rate == 0 {
            return fail("tick_rate must be positive".into());
        }
        if self.bird_x < 0
            || self.bird_x >= self.window_width
            || self.bird_y < 0.0
            || self.bird_y >= self.floor as f64
        {
            return fail(format!(
                "bird spawn ({}, {}) outside playfield",
                self.bird_x, self.bird_y
            ));
        }
        if self.pipe_gap <= 0 {
            return fail(format!("pipe_gap must be positive, got {}", self.pipe_gap));
        }
        if self.pipe_height_min >= self.pipe_height_max {
            return fail(format!(
                "empty gap range [{}, {})",
                self.pipe_height_min, self.pipe_height_max
            ));
        }
        if self.pipe_velocity <= 0.0 || self.ground_velocity < 0.0 {
            return fail("pipe_velocity must be positive and ground_velocity non-negative".into());
        }
        if self.ground_tile_width <= 0.0 {
            return fail("ground_tile_width must be positive".into());
        }
        if self.min_rotation > self.max_rotation {
            return fail(format!(
                "min_rotation {} above max_rotation {}",
                self.min_rotation, self.max_rotation
            ));
        }
        if self.animation_ticks == 0 {
            return fail("animation_ticks must be positive".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference() {
        let config = GameConfig::default();
        assert_eq!(config.window_width, 600);
        assert_eq!(config.floor, 730);
        assert_eq!(config.tick_rate, 30);
        assert_eq!(config.pipe_gap, 200);
        assert_eq!(config.jump_velocity, -10.5);
        assert_eq!(config.spawn_x(), 600.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "pipe_gap": 180, "spawn_policy": "PerTick" }"#)
            .expect("valid config");
        assert_eq!(config.pipe_gap, 180);
        assert_eq!(config.spawn_policy, SpawnPolicy::PerTick);
        assert_eq!(config.floor, FLOOR);
    }

    #[test]
    fn test_invalid_gap_rejected() {
        let err = GameConfig::from_json(r#"{ "pipe_gap": -5 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_spawn_outside_playfield_rejected() {
        let config = GameConfig {
            bird_y: 900.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = GameConfig::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_spawn_policy() {
        assert_eq!(SpawnPolicy::PerTick.spawn_count(0), 0);
        assert_eq!(SpawnPolicy::PerTick.spawn_count(3), 1);
        assert_eq!(SpawnPolicy::PerPass.spawn_count(3), 3);
        assert_eq!(SpawnPolicy::from_str("Per_Tick"), Some(SpawnPolicy::PerTick));
        assert_eq!(SpawnPolicy::from_str("sideways"), None);
    }
}
