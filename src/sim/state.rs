//! Game state and session configuration
//!
//! One aggregate owns everything the tick mutates: units, drones, the town
//! centre, progression, the spawn timer and the RNG.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::drone::Drone;
use super::entity::Entity;
use super::progression::LevelManager;
use super::town_centre::TownCentre;
use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Units are coming
    Playing,
    /// The town centre fell; ticking is a no-op
    GameOver,
}

/// Session parameters fixed at start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed
    pub seed: u64,
    /// Screen size in pixels; the town centre sits in the middle
    pub width: f64,
    pub height: f64,
    /// Frames between spawns at level 1
    pub base_spawn_interval: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            base_spawn_interval: BASE_SPAWN_INTERVAL,
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: SimConfig,
    pub phase: GamePhase,
    /// Ticks simulated so far
    pub time_ticks: u64,
    /// Clock reading of the most recent tick
    pub now_ms: u64,
    /// Frames since the last spawn
    pub spawn_timer: u32,
    pub town: TownCentre,
    /// Living units, in spawn order
    pub entities: Vec<Entity>,
    /// Drones, in purchase order
    pub drones: Vec<Drone>,
    pub progression: LevelManager,
    /// Units removed over the whole session
    pub total_defeated: u64,
    pub rng: Pcg32,
    next_id: u32,
}

impl GameState {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            phase: GamePhase::Playing,
            time_ticks: 0,
            now_ms: 0,
            spawn_timer: 0,
            town: TownCentre::new(DVec2::new(config.width / 2.0, config.height / 2.0)),
            entities: Vec::new(),
            drones: Vec::new(),
            progression: LevelManager::default(),
            total_defeated: 0,
            rng: Pcg32::seed_from_u64(config.seed),
            next_id: 1,
        }
    }

    /// Allocate a new unit ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Screen size as a vector
    pub fn bounds(&self) -> DVec2 {
        DVec2::new(self.config.width, self.config.height)
    }

    /// Spawn a random unit at the current progression speed
    pub fn spawn_unit(&mut self) -> &Entity {
        let id = self.next_entity_id();
        let bounds = self.bounds();
        let speed_multiplier = self.progression.speed_multiplier;
        let unit = Entity::spawn(id, &mut self.rng, bounds, speed_multiplier);
        log::debug!(
            "Spawned {:?} #{} at ({:.0}, {:.0})",
            unit.variant,
            unit.id,
            unit.pos.x,
            unit.pos.y
        );
        self.entities.push(unit);
        &self.entities[self.entities.len() - 1]
    }

    /// Add a drone at a random screen edge
    pub fn spawn_drone(&mut self) {
        let bounds = self.bounds();
        let drone = Drone::spawn(&mut self.rng, bounds);
        self.drones.push(drone);
        log::info!("Drone launched ({} in service)", self.drones.len());
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_centres_town() {
        let state = GameState::new(SimConfig::default());
        assert_eq!(state.town.pos, DVec2::new(600.0, 450.0));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.entities.is_empty());
        assert!(state.drones.is_empty());
    }

    #[test]
    fn test_spawn_unit_uses_progression_speed() {
        let mut state = GameState::new(SimConfig::default());
        let unit = state.spawn_unit().clone();
        assert_eq!(unit.id, 1);
        assert!((unit.speed - unit.base_speed * 0.5).abs() < 1e-12);
        assert_eq!(state.spawn_unit().id, 2);
    }

    #[test]
    fn test_same_seed_same_spawns() {
        let mut a = GameState::new(SimConfig::default());
        let mut b = GameState::new(SimConfig::default());
        for _ in 0..20 {
            let ua = a.spawn_unit().clone();
            let ub = b.spawn_unit().clone();
            assert_eq!(ua.variant, ub.variant);
            assert_eq!(ua.pos, ub.pos);
        }
    }

    #[test]
    fn test_spawn_drone_off_screen() {
        let mut state = GameState::new(SimConfig::default());
        state.spawn_drone();
        let d = &state.drones[0];
        let outside = d.pos.x < 0.0 || d.pos.y < 0.0 || d.pos.x > 1200.0 || d.pos.y > 900.0;
        assert!(outside);
    }
}
