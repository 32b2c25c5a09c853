//! Fixed-tick simulation step
//!
//! Order within a tick matters:
//! spawn, status field + movement, drones, town centre, sweep, progression,
//! then the game-over check.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::drone::{DroneContext, update_drones};
use super::entity::Variant;
use super::state::{GamePhase, GameState};
use crate::error::{ActionError, ActionResult};

/// A player request. Affordability is the caller's job; prerequisites that
/// depend on simulation state are checked here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    UpgradeLaser,
    PlaceBomb { x: f64, y: f64 },
    UpgradeBomb,
    UpgradeHealth,
    ActivateAntiGrav,
    UpgradeAntiGrav,
    SpawnDrone,
    UpgradeDrone,
    UpgradeHarvesting,
}

/// Something worth telling the outside world about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    UnitSpawned { id: u32, variant: Variant },
    /// A unit was removed; `contact` is true if it reached the town centre
    UnitDefeated {
        id: u32,
        variant: Variant,
        value: i32,
        contact: bool,
    },
    BombDetonated { pos: DVec2 },
    ExplosionExpired,
    LevelUp { level: u32 },
    GameOver,
}

/// Outcome of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Units removed this tick (contact or combat)
    pub defeated: u32,
    /// Resources earned this tick
    pub reward: i64,
    pub events: Vec<GameEvent>,
    pub game_over: bool,
}

/// Apply a player action to the simulation.
///
/// On error nothing was changed.
pub fn apply_action(state: &mut GameState, action: PlayerAction, now_ms: u64) -> ActionResult<()> {
    if state.is_over() {
        return Err(ActionError::GameOver);
    }

    match action {
        PlayerAction::UpgradeLaser => state.town.laser.upgrade(),
        PlayerAction::PlaceBomb { x, y } => state.town.bombs.place(DVec2::new(x, y), now_ms)?,
        PlayerAction::UpgradeBomb => state.town.bombs.upgrade(),
        PlayerAction::UpgradeHealth => {
            state.town.upgrade_health();
        }
        PlayerAction::ActivateAntiGrav => state.town.anti_grav.activate()?,
        PlayerAction::UpgradeAntiGrav => state.town.anti_grav.upgrade()?,
        PlayerAction::SpawnDrone => state.spawn_drone(),
        PlayerAction::UpgradeDrone => {
            if state.drones.is_empty() {
                return Err(ActionError::NoDrones);
            }
            for drone in &mut state.drones {
                drone.upgrade();
            }
            if let Some(d) = state.drones.first() {
                log::info!(
                    "Drones upgraded - detect {}, attack {}, damage {}, cooldown {}ms",
                    d.detect_radius,
                    d.attack_radius,
                    d.laser_damage,
                    d.laser_cooldown_ms
                );
            }
        }
        PlayerAction::UpgradeHarvesting => {
            // One-time bump for units already on the field; new spawns use the stat table
            for unit in &mut state.entities {
                unit.value += 1;
            }
        }
    }
    Ok(())
}

/// Advance the game state by one frame. `now_ms` is a monotonic clock reading.
pub fn tick(state: &mut GameState, now_ms: u64) -> TickReport {
    if state.is_over() {
        return TickReport::default();
    }

    let mut report = TickReport::default();
    state.time_ticks += 1;
    state.now_ms = now_ms;

    // Spawn
    state.spawn_timer += 1;
    let interval = state.progression.spawn_interval(state.config.base_spawn_interval);
    if state.spawn_timer >= interval {
        let unit = state.spawn_unit();
        report.events.push(GameEvent::UnitSpawned {
            id: unit.id,
            variant: unit.variant,
        });
        state.spawn_timer = 0;
    }

    // Movement under the anti-grav field
    let town_pos = state.town.pos;
    for unit in state.entities.iter_mut() {
        let scale = state.town.anti_grav.multiplier(unit.pos, town_pos);
        unit.advance(town_pos, scale, now_ms, &mut state.rng);
    }

    // Drones
    let ctx = DroneContext {
        town_pos,
        anti_grav_radius: state.town.anti_grav.radius,
        bounds: state.bounds(),
        now_ms,
    };
    update_drones(&mut state.drones, &mut state.entities, &ctx);

    // Town centre
    let town_report = state.town.update(&mut state.entities, now_ms);
    if let Some(pos) = town_report.bomb.detonated {
        log::debug!("Bomb detonated at ({:.0}, {:.0})", pos.x, pos.y);
        report.events.push(GameEvent::BombDetonated { pos });
    }
    if town_report.bomb.expired {
        report.events.push(GameEvent::ExplosionExpired);
    }

    // Sweep: contact first, then combat deaths
    let town = &mut state.town;
    let mut defeated = 0u32;
    let mut reward = 0i64;
    let events = &mut report.events;
    state.entities.retain(|unit| {
        let contact = unit.touches(town.pos, town.radius);
        if contact {
            town.take_damage(unit.damage);
        } else if !unit.is_dead() {
            return true;
        }
        defeated += 1;
        reward += unit.value as i64;
        events.push(GameEvent::UnitDefeated {
            id: unit.id,
            variant: unit.variant,
            value: unit.value,
            contact,
        });
        false
    });
    report.defeated = defeated;
    report.reward = reward;
    state.total_defeated += defeated as u64;

    // Progression
    if state.progression.update(defeated) > 0 {
        report.events.push(GameEvent::LevelUp {
            level: state.progression.level,
        });
    }

    // Terminal
    if state.town.is_destroyed() {
        state.phase = GamePhase::GameOver;
        report.game_over = true;
        report.events.push(GameEvent::GameOver);
        log::info!(
            "Town centre destroyed at level {} after {} ticks ({} units defeated)",
            state.progression.level,
            state.time_ticks,
            state.total_defeated
        );
    }

    report
}
