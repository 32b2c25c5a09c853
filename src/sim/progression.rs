//! Level progression
//!
//! Every removed unit is one experience point. Levels make units arrive
//! faster and move faster (up to full speed).

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Experience and the difficulty multipliers it drives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelManager {
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub spawn_rate_multiplier: f64,
    /// Capped at 1.0
    pub speed_multiplier: f64,
}

impl Default for LevelManager {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            xp_to_next_level: XP_TO_FIRST_LEVEL,
            spawn_rate_multiplier: 1.0,
            speed_multiplier: START_SPEED_MULTIPLIER,
        }
    }
}

impl LevelManager {
    /// Add experience for `defeated` units. Returns the number of levels gained.
    pub fn update(&mut self, defeated: u32) -> u32 {
        self.xp += defeated;
        let mut gained = 0;
        while self.xp >= self.xp_to_next_level {
            self.level_up();
            gained += 1;
        }
        gained
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.xp -= self.xp_to_next_level;
        self.xp_to_next_level = (self.xp_to_next_level as f64 * XP_GROWTH) as u32;
        self.spawn_rate_multiplier *= SPAWN_RATE_GROWTH;
        self.speed_multiplier = (self.speed_multiplier + SPEED_MULTIPLIER_STEP).min(1.0);
        log::info!(
            "Level up! Level {}, speed {:.0}%, spawn rate {:.2}",
            self.level,
            self.speed_multiplier * 100.0,
            self.spawn_rate_multiplier
        );
    }

    /// Frames between spawns, never below one
    pub fn spawn_interval(&self, base_interval: u32) -> u32 {
        ((base_interval as f64 / self.spawn_rate_multiplier) as u32).max(1)
    }

    /// Speed a unit with `base_speed` spawns with
    pub fn unit_speed(&self, base_speed: f64) -> f64 {
        base_speed * self.speed_multiplier
    }
}
