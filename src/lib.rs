//! Flapsim - a side-scrolling flap-through-the-gaps game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, silhouette collisions, round state)
//! - `config`: The immutable game configuration threaded through the sim
//! - `leaderboard`: Best rounds of the session
//!
//! Asset decoding, fonts, windowing and the render loop are not part of this
//! crate. A frontend feeds [`sim::TickInput`] into [`sim::tick`] once per tick
//! and draws whatever [`sim::GameState`] holds afterwards.

pub mod config;
pub mod leaderboard;
pub mod sim;

pub use config::{ConfigError, GameConfig, SpawnPolicy};
pub use leaderboard::{Leaderboard, RoundResult};

/// Reference game constants (defaults for [`GameConfig`])
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_RATE: u32 = 30;

    /// Window dimensions
    pub const WIN_WIDTH: i32 = 600;
    pub const WIN_HEIGHT: i32 = 800;
    /// Top of the ground strip; the bird dies when its frame reaches it
    pub const FLOOR: i32 = 730;

    /// Bird spawn point
    pub const BIRD_X: i32 = 230;
    pub const BIRD_Y: f64 = 350.0;
    /// Velocity set by a flap (negative = upward)
    pub const JUMP_VELOCITY: f64 = -10.5;
    /// Half the per-tick² acceleration (displacement = v·t + GRAVITY·t²)
    pub const GRAVITY: f64 = 1.5;
    /// Terminal per-tick fall displacement
    pub const TERMINAL_DISPLACEMENT: f64 = 16.0;
    /// Extra upward push while rising
    pub const RISE_BIAS: f64 = 2.0;

    /// Tilt limits (degrees) and downward tilt speed per tick
    pub const MAX_ROTATION: f64 = 25.0;
    pub const MIN_ROTATION: f64 = -90.0;
    pub const ROTATION_VELOCITY: f64 = 20.0;
    /// Distance below the flap height that still counts as "rising" for tilt
    pub const TILT_HOLD_DISTANCE: f64 = 50.0;
    /// Ticks each animation frame is held
    pub const ANIMATION_TICKS: u32 = 5;

    /// Pipe defaults
    pub const PIPE_GAP: i32 = 200;
    pub const PIPE_VELOCITY: f32 = 5.0;
    /// Gap center range, `[min, max)`
    pub const PIPE_HEIGHT_MIN: i32 = 50;
    pub const PIPE_HEIGHT_MAX: i32 = 450;
    /// Where the first pipe of a round appears
    pub const FIRST_PIPE_X: f32 = 700.0;

    /// Ground strip
    pub const GROUND_VELOCITY: f32 = 5.0;
    pub const GROUND_TILE_WIDTH: f32 = 672.0;

    /// Silhouette mask opacity threshold (alpha > threshold is solid)
    pub const ALPHA_THRESHOLD: u8 = 127;
}
