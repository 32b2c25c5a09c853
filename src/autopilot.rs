//! Idle mode: a stand-in player for headless runs
//!
//! Picks at most one action per call. Bombs first when something is close,
//! then anti-grav, then a small drone escort, then whichever upgrade is
//! furthest behind.

use glam::DVec2;

use crate::economy::{Ledger, cost_of};
use crate::sim::collision::nearest;
use crate::sim::{GameState, PlayerAction};

/// Units closer than this to the town centre draw a bomb
pub const BOMB_TRIGGER_DISTANCE: f64 = 250.0;
/// Drones bought before the autopilot starts upgrading
pub const ESCORT_SIZE: usize = 3;

/// Pick the next purchase, or `None` to wait
pub fn choose_action(state: &GameState, ledger: &Ledger, now_ms: u64) -> Option<PlayerAction> {
    if state.is_over() {
        return None;
    }

    let affordable = |action: PlayerAction| ledger.can_afford(cost_of(action, state));

    // Bomb the most urgent unit
    let bombs = &state.town.bombs;
    if bombs.bomb.is_none() && bombs.cooldown_remaining(now_ms) == 0 {
        let living = state
            .entities
            .iter()
            .filter(|e| !e.is_dead())
            .map(|e| (e.pos, e.pos));
        if let Some((pos, dist)) = nearest(state.town.pos, living)
            && dist <= BOMB_TRIGGER_DISTANCE
        {
            let action = bomb_at(pos);
            if affordable(action) {
                return Some(action);
            }
        }
    }

    if !state.town.anti_grav.active {
        return affordable(PlayerAction::ActivateAntiGrav).then_some(PlayerAction::ActivateAntiGrav);
    }

    if state.drones.len() < ESCORT_SIZE {
        return affordable(PlayerAction::SpawnDrone).then_some(PlayerAction::SpawnDrone);
    }

    let drone_level = state.drones.iter().map(|d| d.level).min().unwrap_or(1);
    let upgrades = [
        (PlayerAction::UpgradeLaser, state.town.laser.level),
        (PlayerAction::UpgradeHealth, state.town.regen.level + 1),
        (PlayerAction::UpgradeAntiGrav, state.town.anti_grav.level),
        (PlayerAction::UpgradeDrone, drone_level),
        (PlayerAction::UpgradeBomb, state.town.bombs.level),
        (PlayerAction::UpgradeHarvesting, ledger.harvesting_level),
    ];

    // Least upgraded first; earlier entries win ties
    upgrades
        .into_iter()
        .filter(|(action, _)| affordable(*action))
        .min_by_key(|(_, level)| *level)
        .map(|(action, _)| action)
}

fn bomb_at(pos: DVec2) -> PlayerAction {
    PlayerAction::PlaceBomb { x: pos.x, y: pos.y }
}
