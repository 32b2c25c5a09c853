//! Runtime settings
//!
//! Read from a JSON file by the headless runner. Missing fields fall back to
//! their defaults, so an empty object is a valid settings file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::SimConfig;

/// Runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; a fresh one is drawn when absent
    pub seed: Option<u64>,

    // === Field ===
    pub screen_width: f64,
    pub screen_height: f64,
    /// Ticks per second
    pub frame_rate: u32,
    /// Frames between spawns at level 1
    pub base_spawn_interval: u32,

    // === Player ===
    pub starting_resources: i64,
    /// Let the idle-mode player spend resources
    pub autopilot: bool,

    // === Runner ===
    /// Stop after this many simulated seconds (0 = until the town falls)
    pub run_seconds: u64,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,
    /// Log a status line this often (simulated seconds, 0 = never)
    pub summary_every_seconds: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            frame_rate: FRAME_RATE,
            base_spawn_interval: BASE_SPAWN_INTERVAL,

            starting_resources: 0,
            autopilot: true,

            run_seconds: 300,
            realtime: false,
            summary_every_seconds: 10,
        }
    }
}

impl Settings {
    /// Load and validate settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dimension_ok = |v: f64| v.is_finite() && v > 0.0;
        if !dimension_ok(self.screen_width) {
            return Err(ConfigError::Invalid {
                field: "screen_width",
                reason: "must be a positive number",
            });
        }
        if !dimension_ok(self.screen_height) {
            return Err(ConfigError::Invalid {
                field: "screen_height",
                reason: "must be a positive number",
            });
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::Invalid {
                field: "frame_rate",
                reason: "must be at least 1",
            });
        }
        if self.base_spawn_interval == 0 {
            return Err(ConfigError::Invalid {
                field: "base_spawn_interval",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Milliseconds per tick
    pub fn tick_ms(&self) -> u64 {
        (1000 / self.frame_rate as u64).max(1)
    }

    /// Simulation parameters for a new session
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            width: self.screen_width,
            height: self.screen_height,
            base_spawn_interval: self.base_spawn_interval,
        }
    }
}
