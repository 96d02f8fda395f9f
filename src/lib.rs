//! Cookout - a single-screen block-breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, collisions, game state)
//! - `stage`: Stage definitions loaded from JSON
//! - `settings`: Data-driven physics tuning
//! - `error`: Load-time errors

pub mod error;
pub mod settings;
pub mod sim;
pub mod stage;

pub use error::Error;
pub use settings::{DeflectionTable, PhysicsSettings, Settings};
pub use stage::{StageSet, StageTuning};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one tick per frame)
    pub const TICK_RATE: u32 = 60;

    /// Screen dimensions
    pub const SCREEN_WIDTH: f32 = 450.0;
    pub const SCREEN_HEIGHT: f32 = 200.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 4.0;
    pub const BALL_GRAVITY: f32 = 0.010;
    /// Speed added on every collision
    pub const VELOCITY_INCREASE: f32 = 0.25;
    pub const MAX_SPEED: f32 = 2.5;
    /// Free-flight cap on downward speed
    pub const TERMINAL_FALL_SPEED: f32 = 5.0;
    pub const LAUNCH_SPEED: f32 = 2.5;
    pub const TRAIL_LENGTH: usize = 10;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 72.0;
    pub const PADDLE_HEIGHT: f32 = 14.0;
    /// Distance from the paddle's top edge to the bottom of the screen
    pub const PADDLE_FLOOR_GAP: f32 = 30.0;
    pub const PADDLE_SPEED: f32 = 2.5;
    pub const PADDLE_SPEED_BONUS: f32 = 0.20;

    /// Collision response
    pub const PUSH_OUT_DAMPING: f32 = 0.9;
    pub const DEAD_ZONE: f32 = 0.05;
    pub const STRAIGHT_NUDGE: f32 = 0.1;
    /// Upper bound on sweep sub-steps per tick
    pub const MAX_SUBSTEPS: u32 = 64;

    /// Reward pickups
    pub const REWARD_WIDTH: f32 = 8.0;
    pub const REWARD_HEIGHT: f32 = 10.0;

    /// Phase timers (ticks)
    pub const DROPPED_TICKS: u32 = 120;
    pub const TRANSITION_TICKS: u32 = 120;
    pub const STREAK_DISPLAY_TICKS: u32 = 60;

    pub const STARTING_LIVES: u32 = 3;
}

/// Unit direction for an angle in degrees, in screen space (y grows downward)
#[inline]
pub fn screen_direction(angle_deg: f32) -> glam::Vec2 {
    let rad = angle_deg.to_radians();
    glam::Vec2::new(rad.cos(), -rad.sin())
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}
