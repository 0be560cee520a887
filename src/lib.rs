//! Rect Arcade - rectangle arcade games on one simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, motion, spawning, collisions, session)
//! - `config`: Engine configuration, variant presets and validation
//! - `scheduler`: Frame loop driving the simulation from host animation callbacks

pub mod config;
pub mod scheduler;
pub mod sim;

pub use config::{ConfigError, EngineConfig, Variant};
pub use scheduler::{FrameHost, FrameScheduler, FrameStatus, ManualFrames, Renderer};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (canvas pixels, origin top-left, y down)
    pub const FIELD_WIDTH: f32 = 400.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 20.0;
    /// Horizontal distance moved per left/right input
    pub const PLAYER_STEP: f32 = 5.0;

    /// Projectile defaults
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 7.0;

    /// Falling blocks
    pub const BLOCK_WIDTH: f32 = 40.0;
    pub const BLOCK_HEIGHT: f32 = 20.0;
    pub const BLOCK_SPEED: f32 = 2.0;
    pub const BLOCK_SPAWN_INTERVAL_MS: f64 = 1500.0;

    /// Patrolling enemies
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 20.0;
    pub const ENEMY_SPEED: f32 = 2.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 1000.0;
    /// Vertical band enemies patrol in (top of the enemy rectangle)
    pub const ENEMY_BAND_MIN_Y: f32 = 40.0;
    pub const ENEMY_BAND_MAX_Y: f32 = 240.0;

    /// Dodger blocks fall faster and more often
    pub const DODGE_BLOCK_SPEED: f32 = 3.0;
    pub const DODGE_SPAWN_INTERVAL_MS: f64 = 700.0;

    /// Flapper (gravity/jump) tuning, per tick
    pub const GRAVITY: f32 = 0.5;
    pub const JUMP_VELOCITY: f32 = -8.0;
    pub const FLAPPER_SIZE: f32 = 24.0;
    pub const PILLAR_WIDTH: f32 = 60.0;
    pub const PILLAR_SPEED: f32 = 2.0;
    pub const PILLAR_GAP: f32 = 150.0;
    pub const PILLAR_MARGIN: f32 = 50.0;
    pub const PILLAR_SPAWN_INTERVAL_MS: f64 = 1600.0;

    /// Clicker targets
    pub const TARGET_SIZE: f32 = 50.0;
    pub const TARGET_SPEED: f32 = 1.5;
    pub const TARGET_SPAWN_INTERVAL_MS: f64 = 900.0;

    /// Nominal frame length used by headless runs (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Clamp a rectangle's left edge so the rectangle stays within `[0, extent]`
#[inline]
pub fn clamp_span(start: f32, size: f32, extent: f32) -> f32 {
    start.clamp(0.0, (extent - size).max(0.0))
}

/// Top-left position that centers a rectangle of `size` inside `field`
#[inline]
pub fn centered(size: Vec2, field: Vec2) -> Vec2 {
    (field - size) / 2.0
}
