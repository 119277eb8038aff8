//! Arcade Sim - deterministic 2D arcade simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, per-variant steps)
//! - `game`: Phase machine, input buffering and best-score bookkeeping
//! - `config`: Data-driven variant configuration
//! - `best_score`: Best-score persistence backends
//! - `assets`: Asset gate that must open before a run can start
//! - `platform`: Rendering surface abstraction and web bindings

pub mod assets;
pub mod best_score;
pub mod config;
pub mod error;
pub mod game;
pub mod platform;
pub mod sim;

pub use best_score::{BestScoreStore, JsonFileStore, MemoryStore};
pub use config::{GameConfig, HighwayConfig, ScrollerConfig, SwarmConfig, SwarmPreset};
pub use error::{ConfigError, GameError, PersistenceError};
pub use game::{Game, GameSnapshot, InputEvent};

use glam::Vec2;
use rand::Rng;

/// Default tuning constants
pub mod consts {
    /// Presentation refresh rate the tick counts are tuned for
    pub const FRAME_RATE: u32 = 60;
    /// Flash pulse duration (~50 ms at 60 Hz)
    pub const FLASH_TICKS: u32 = 3;

    // Highway
    pub const HIGHWAY_WIDTH: f32 = 480.0;
    pub const HIGHWAY_HEIGHT: f32 = 900.0;
    pub const LANE_COUNT: u8 = 3;
    pub const LANE_MARGIN: f32 = 30.0;
    pub const VEHICLE_WIDTH: f32 = 130.0;
    pub const VEHICLE_HEIGHT: f32 = 160.0;
    pub const ENEMY_COUNT: usize = 3;
    pub const ENEMY_SPEED: f32 = 5.0;
    /// Distance between speed bumps
    pub const SPEED_STEP_DISTANCE: f32 = 2000.0;
    pub const SPEED_INCREMENT: f32 = 1.0;
    pub const ROAD_LINE_COUNT: usize = 5;
    pub const ROAD_LINE_WIDTH: f32 = 10.0;
    /// Blank space between consecutive road lines
    pub const ROAD_LINE_SPACING: f32 = 70.0;
    pub const SHOT_WIDTH: f32 = 40.0;
    pub const SHOT_HEIGHT: f32 = 50.0;
    pub const SHOT_SPEED: f32 = 30.0;

    // Scroller
    pub const SCROLLER_WIDTH: f32 = 768.0;
    pub const SCROLLER_HEIGHT: f32 = 1024.0;
    pub const FLYER_WIDTH: f32 = 85.0;
    pub const FLYER_HEIGHT: f32 = 60.0;
    pub const GATE_WIDTH: f32 = 130.0;
    pub const GATE_SPACING: f32 = 450.0;
    pub const GATE_COUNT: usize = 2;
    pub const GATE_GAP_HEIGHT: f32 = FLYER_HEIGHT * 6.0;
    /// Keeps gaps away from the top and bottom sixth of the arena
    pub const GAP_MARGIN_RATIO: f32 = 1.0 / 6.0;
    pub const SCROLL_DX: f32 = -4.5;
    pub const DEFAULT_DY: f32 = 0.03;
    pub const GRAVITY: f32 = 1.0;
    pub const RISE_DECEL: f32 = 8.0;
    pub const JUMP_DY: f32 = -60.0;
    pub const HANG_TICKS: u32 = 10;

    // Swarm
    pub const SWARM_WIDTH: f32 = 1280.0;
    pub const SWARM_HEIGHT: f32 = 720.0;
    /// Width of the per-axis velocity range of a roamer
    pub const KNOTS: f32 = 30.0;
    pub const BALL_COUNT: usize = 100;
    pub const BALL_MIN_RADIUS: f32 = 5.0;
    pub const BALL_MAX_RADIUS: f32 = 30.0;
    pub const ANT_COUNT: usize = 20;
    pub const ANT_RADIUS: f32 = 80.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Uniform value in `[min, max)`; collapses to `min` on an empty range
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Heading of a velocity vector in degrees, measured from +x toward +y
#[inline]
pub fn heading_degrees(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x).to_degrees()
}
