//! Idle Tower - a single-screen idle tower defense
//!
//! Core modules:
//! - `sim`: Fixed-tick simulation (units, town centre, drones, progression)
//! - `economy`: Resource ledger and the upgrade cost table
//! - `autopilot`: Idle-mode player that spends resources on its own
//! - `settings`: Runtime configuration
//! - `error`: Rejection and configuration errors

pub mod autopilot;
pub mod economy;
pub mod error;
pub mod settings;
pub mod sim;

pub use economy::Ledger;
pub use error::{ActionError, ConfigError};
pub use settings::Settings;

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Default screen dimensions (pixels)
    pub const SCREEN_WIDTH: f64 = 1200.0;
    pub const SCREEN_HEIGHT: f64 = 900.0;

    /// Frames per second the loop is capped at
    pub const FRAME_RATE: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Frames between unit spawns at level 1
    pub const BASE_SPAWN_INTERVAL: u32 = 60;
    /// How far outside the screen edge units appear
    pub const SPAWN_PADDING: f64 = 50.0;

    /// Town centre defaults
    pub const TOWN_RADIUS: f64 = 50.0;
    pub const TOWN_MAX_HEALTH: i32 = 1000;
    pub const REGEN_INTERVAL_MS: u64 = 2000;

    /// Laser defaults
    pub const LASER_DAMAGE: i32 = 10;
    pub const LASER_COOLDOWN_MS: u64 = 1000;
    pub const LASER_MIN_COOLDOWN_MS: u64 = 100;
    pub const LASER_RANGE: f64 = 100.0;
    /// How long the beam stays visible after firing
    pub const LASER_BEAM_MS: u64 = 100;

    /// Bomb defaults
    pub const BOMB_DAMAGE: i32 = 50;
    pub const BOMB_RADIUS: f64 = 100.0;
    pub const BOMB_FUSE_MS: u64 = 2000;
    pub const BOMB_COOLDOWN_MS: u64 = 5000;
    pub const EXPLOSION_DURATION_MS: u64 = 1000;
    pub const BOMB_COST: i64 = 5;

    /// Anti-grav defaults
    pub const ANTI_GRAV_RADIUS: f64 = 150.0;
    pub const ANTI_GRAV_SLOW: f64 = 0.5;
    /// Slow never drops below this (keeps the multiplier positive)
    pub const ANTI_GRAV_MIN_SLOW: f64 = 0.1;

    /// Drone defaults
    pub const DRONE_SIZE: f64 = 25.0;
    pub const DRONE_SPEED: f64 = 2.0;
    pub const DRONE_DETECT_RADIUS: f64 = 100.0;
    pub const DRONE_ATTACK_RADIUS: f64 = 80.0;
    pub const DRONE_LASER_DAMAGE: i32 = 20;
    pub const DRONE_LASER_COOLDOWN_MS: u64 = 500;
    pub const DRONE_MIN_COOLDOWN_MS: u64 = 100;
    pub const DRONE_LASER_VISIBLE_MS: u64 = 100;
    pub const DRONE_PATROL_SPEED: f64 = 0.02;
    pub const DRONE_SEPARATION: f64 = 50.0;
    pub const DRONE_ALIGNMENT: f64 = 0.1;
    pub const DRONE_COHESION: f64 = 0.1;
    pub const DRONE_ROTATION_SPEED: f64 = 0.1;
    /// Heading errors below this are left alone
    pub const DRONE_ROTATION_DEADZONE: f64 = 0.01;

    /// Progression defaults
    pub const XP_TO_FIRST_LEVEL: u32 = 100;
    pub const XP_GROWTH: f64 = 1.2;
    pub const SPAWN_RATE_GROWTH: f64 = 1.05;
    pub const START_SPEED_MULTIPLIER: f64 = 0.5;
    pub const SPEED_MULTIPLIER_STEP: f64 = 0.05;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f64) -> f64 {
    use std::f64::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Heading (radians) from `from` toward `to`
#[inline]
pub fn heading_to(from: DVec2, to: DVec2) -> f64 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Offset of length `r` along heading `theta`
#[inline]
pub fn polar_offset(r: f64, theta: f64) -> DVec2 {
    DVec2::new(r * theta.cos(), r * theta.sin())
}
