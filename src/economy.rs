//! Resource ledger
//!
//! The simulation never touches resources. The ledger owns the running total,
//! gates every action on its cost, and collects the rewards each tick reports.

use crate::error::{ActionError, ActionResult};
use crate::sim::{GameState, PlayerAction, TickReport, apply_action};

/// Fixed upgrade prices
pub mod costs {
    pub const UPGRADE_LASER: i64 = 50;
    pub const UPGRADE_BOMB: i64 = 100;
    pub const UPGRADE_HEALTH: i64 = 100;
    pub const ACTIVATE_ANTI_GRAV: i64 = 50;
    pub const UPGRADE_ANTI_GRAV: i64 = 50;
    pub const SPAWN_DRONE: i64 = 200;
    pub const UPGRADE_DRONE: i64 = 100;
    pub const UPGRADE_HARVESTING: i64 = 50;
}

/// Price of `action` right now. Bombs cost whatever the launcher says.
pub fn cost_of(action: PlayerAction, state: &GameState) -> i64 {
    match action {
        PlayerAction::UpgradeLaser => costs::UPGRADE_LASER,
        PlayerAction::PlaceBomb { .. } => state.town.bombs.cost,
        PlayerAction::UpgradeBomb => costs::UPGRADE_BOMB,
        PlayerAction::UpgradeHealth => costs::UPGRADE_HEALTH,
        PlayerAction::ActivateAntiGrav => costs::ACTIVATE_ANTI_GRAV,
        PlayerAction::UpgradeAntiGrav => costs::UPGRADE_ANTI_GRAV,
        PlayerAction::SpawnDrone => costs::SPAWN_DRONE,
        PlayerAction::UpgradeDrone => costs::UPGRADE_DRONE,
        PlayerAction::UpgradeHarvesting => costs::UPGRADE_HARVESTING,
    }
}

/// Player resources and lifetime totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub resources: i64,
    pub harvesting_level: u32,
    pub earned: i64,
    pub spent: i64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Ledger {
    pub fn new(starting_resources: i64) -> Self {
        Self {
            resources: starting_resources,
            harvesting_level: 1,
            earned: 0,
            spent: 0,
        }
    }

    pub fn can_afford(&self, cost: i64) -> bool {
        self.resources >= cost
    }

    /// Checks made before the simulation sees an action: affordability and
    /// the bomb placement cooldown. Returns the cost to charge.
    pub fn check(&self, state: &GameState, action: PlayerAction, now_ms: u64) -> ActionResult<i64> {
        if state.is_over() {
            return Err(ActionError::GameOver);
        }

        let cost = cost_of(action, state);
        if !self.can_afford(cost) {
            return Err(ActionError::InsufficientResources {
                cost,
                available: self.resources,
            });
        }

        if let PlayerAction::PlaceBomb { .. } = action {
            let remaining_ms = state.town.bombs.cooldown_remaining(now_ms);
            if remaining_ms > 0 {
                return Err(ActionError::BombCoolingDown { remaining_ms });
            }
        }

        Ok(cost)
    }

    /// Check, apply, and charge. Nothing is charged if the action is refused.
    pub fn apply(&mut self, state: &mut GameState, action: PlayerAction, now_ms: u64) -> ActionResult<()> {
        let result = self
            .check(state, action, now_ms)
            .and_then(|cost| apply_action(state, action, now_ms).map(|()| cost));

        match result {
            Ok(cost) => {
                self.resources -= cost;
                self.spent += cost;
                if action == PlayerAction::UpgradeHarvesting {
                    self.harvesting_level += 1;
                }
                log::debug!("{:?} bought for {} ({} left)", action, cost, self.resources);
                Ok(())
            }
            Err(e) => {
                log::warn!("{:?} rejected: {}", action, e);
                Err(e)
            }
        }
    }

    /// Collect the rewards from one tick
    pub fn credit(&mut self, report: &TickReport) {
        self.resources += report.reward;
        self.earned += report.reward;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameEvent, SimConfig, Variant};

    fn state() -> GameState {
        GameState::new(SimConfig::default())
    }

    #[test]
    fn test_cost_table() {
        let s = state();
        assert_eq!(cost_of(PlayerAction::UpgradeLaser, &s), 50);
        assert_eq!(cost_of(PlayerAction::PlaceBomb { x: 0.0, y: 0.0 }, &s), 5);
        assert_eq!(cost_of(PlayerAction::UpgradeBomb, &s), 100);
        assert_eq!(cost_of(PlayerAction::SpawnDrone, &s), 200);
        assert_eq!(cost_of(PlayerAction::UpgradeHarvesting, &s), 50);
    }

    #[test]
    fn test_purchase_deducts() {
        let mut s = state();
        let mut ledger = Ledger::new(120);
        ledger.apply(&mut s, PlayerAction::UpgradeLaser, 0).unwrap();
        assert_eq!(ledger.resources, 70);
        assert_eq!(ledger.spent, 50);
        assert_eq!(s.town.laser.level, 2);
    }

    #[test]
    fn test_unaffordable_changes_nothing() {
        let mut s = state();
        let mut ledger = Ledger::new(199);
        assert_eq!(
            ledger.apply(&mut s, PlayerAction::SpawnDrone, 0),
            Err(ActionError::InsufficientResources {
                cost: 200,
                available: 199
            })
        );
        assert_eq!(ledger.resources, 199);
        assert!(s.drones.is_empty());
    }

    #[test]
    fn test_core_rejection_is_not_charged() {
        let mut s = state();
        let mut ledger = Ledger::new(500);
        assert_eq!(
            ledger.apply(&mut s, PlayerAction::UpgradeAntiGrav, 0),
            Err(ActionError::AntiGravInactive)
        );
        assert_eq!(
            ledger.apply(&mut s, PlayerAction::UpgradeDrone, 0),
            Err(ActionError::NoDrones)
        );
        assert_eq!(ledger.resources, 500);
        assert_eq!(ledger.spent, 0);
    }

    #[test]
    fn test_bomb_cooldown() {
        let mut s = state();
        let mut ledger = Ledger::new(100);
        let bomb = PlayerAction::PlaceBomb { x: 300.0, y: 300.0 };
        ledger.apply(&mut s, bomb, 1000).unwrap();
        assert_eq!(ledger.resources, 95);
        assert_eq!(
            ledger.apply(&mut s, bomb, 4000),
            Err(ActionError::BombCoolingDown { remaining_ms: 2000 })
        );
        assert_eq!(ledger.resources, 95);

        // Detonates at 3000, burns out at 4000; cooldown over at 6000
        crate::sim::tick(&mut s, 3000);
        crate::sim::tick(&mut s, 4000);
        ledger.apply(&mut s, bomb, 6000).unwrap();
        assert_eq!(ledger.resources, 90);
    }

    #[test]
    fn test_harvesting_level_tracked() {
        let mut s = state();
        let mut ledger = Ledger::new(100);
        ledger.apply(&mut s, PlayerAction::UpgradeHarvesting, 0).unwrap();
        ledger.apply(&mut s, PlayerAction::UpgradeHarvesting, 0).unwrap();
        assert_eq!(ledger.harvesting_level, 3);
        assert_eq!(ledger.resources, 0);
    }

    #[test]
    fn test_credit_adds_reward() {
        let mut ledger = Ledger::new(10);
        let report = TickReport {
            defeated: 2,
            reward: 7,
            events: vec![GameEvent::UnitDefeated {
                id: 1,
                variant: Variant::Star,
                value: 5,
                contact: false,
            }],
            game_over: false,
        };
        ledger.credit(&report);
        assert_eq!(ledger.resources, 17);
        assert_eq!(ledger.earned, 7);
    }

    #[test]
    fn test_game_over_refuses_everything() {
        let mut s = state();
        s.town.health = 1;
        s.entities.push(crate::sim::Entity::new(1, Variant::Star, s.town.pos, 1.0));
        crate::sim::tick(&mut s, 16);
        assert!(s.is_over());

        let mut ledger = Ledger::new(1000);
        assert_eq!(
            ledger.apply(&mut s, PlayerAction::UpgradeHealth, 32),
            Err(ActionError::GameOver)
        );
        assert_eq!(ledger.resources, 1000);
    }
}
