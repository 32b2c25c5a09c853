//! The town centre and its weapons
//!
//! Three subsystems hang off the structure: a cooldown-gated laser that hits
//! the nearest unit, a placed bomb that detonates after a fuse and then burns
//! for a fixed window, and a slow health regen. Every timer here reads the
//! millisecond clock passed into the tick, never the frame count.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::{nearest, within_range};
use super::entity::Entity;
use super::field::AntiGrav;
use crate::consts::*;
use crate::error::{ActionError, ActionResult};

/// Town-centre laser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub damage: i32,
    pub cooldown_ms: u64,
    pub range: f64,
    pub level: u32,
    pub last_fire_ms: u64,
    /// Unit hit by the last shot, while the beam is visible
    pub target: Option<u32>,
    /// Beam endpoints, while visible
    pub line: Option<(DVec2, DVec2)>,
}

impl Default for Laser {
    fn default() -> Self {
        Self {
            damage: LASER_DAMAGE,
            cooldown_ms: LASER_COOLDOWN_MS,
            range: LASER_RANGE,
            level: 1,
            last_fire_ms: 0,
            target: None,
            line: None,
        }
    }
}

impl Laser {
    /// Fire at the nearest unit if recharged and in range.
    ///
    /// Returns the id of the unit hit. Between shots the beam is cleared once
    /// it has been visible for [`LASER_BEAM_MS`].
    pub fn update(&mut self, origin: DVec2, entities: &mut [Entity], now_ms: u64) -> Option<u32> {
        let elapsed = now_ms.saturating_sub(self.last_fire_ms);

        if elapsed >= self.cooldown_ms {
            let living = entities
                .iter()
                .enumerate()
                .filter(|(_, e)| !e.is_dead())
                .map(|(i, e)| (i, e.pos));
            let closest = nearest(origin, living);
            match closest {
                Some((i, dist)) if dist <= self.range => {
                    let unit = &mut entities[i];
                    unit.take_damage(self.damage);
                    self.target = Some(unit.id);
                    self.line = Some((origin, unit.pos));
                    self.last_fire_ms = now_ms;
                    return Some(unit.id);
                }
                _ => self.clear_beam(),
            }
        } else if elapsed >= LASER_BEAM_MS {
            self.clear_beam();
        }
        None
    }

    fn clear_beam(&mut self) {
        self.target = None;
        self.line = None;
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        self.damage += 5;
        self.cooldown_ms = self.cooldown_ms.saturating_sub(100).max(LASER_MIN_COOLDOWN_MS);
        self.range += 2.0;
        log::info!(
            "Laser upgraded - level {}, damage {}, {:.2} shots/s, range {}",
            self.level,
            self.damage,
            1000.0 / self.cooldown_ms as f64,
            self.range
        );
    }
}

/// An armed bomb waiting on its fuse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: DVec2,
    pub placed_ms: u64,
}

/// A detonated bomb dealing area damage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: DVec2,
    pub started_ms: u64,
}

/// Bomb phase transitions from one timer pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BombTransitions {
    /// Where the armed bomb went off
    pub detonated: Option<DVec2>,
    /// An explosion burned out
    pub expired: bool,
}

/// Bomb launcher. Holds at most one armed bomb and one explosion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BombLauncher {
    pub damage: i32,
    pub radius: f64,
    pub fuse_ms: u64,
    pub explosion_ms: u64,
    /// Minimum time between placements (checked by the ledger)
    pub cooldown_ms: u64,
    pub cost: i64,
    pub level: u32,
    pub last_placed_ms: Option<u64>,
    pub bomb: Option<Bomb>,
    pub explosion: Option<Explosion>,
}

impl Default for BombLauncher {
    fn default() -> Self {
        Self {
            damage: BOMB_DAMAGE,
            radius: BOMB_RADIUS,
            fuse_ms: BOMB_FUSE_MS,
            explosion_ms: EXPLOSION_DURATION_MS,
            cooldown_ms: BOMB_COOLDOWN_MS,
            cost: BOMB_COST,
            level: 1,
            last_placed_ms: None,
            bomb: None,
            explosion: None,
        }
    }
}

impl BombLauncher {
    /// Arm a bomb at `pos`
    pub fn place(&mut self, pos: DVec2, now_ms: u64) -> ActionResult<()> {
        if self.bomb.is_some() {
            return Err(ActionError::BombArmed);
        }
        self.bomb = Some(Bomb { pos, placed_ms: now_ms });
        self.last_placed_ms = Some(now_ms);
        log::debug!("Bomb placed at ({:.0}, {:.0})", pos.x, pos.y);
        Ok(())
    }

    /// Milliseconds until another bomb may be placed
    pub fn cooldown_remaining(&self, now_ms: u64) -> u64 {
        match self.last_placed_ms {
            Some(t) => self.cooldown_ms.saturating_sub(now_ms.saturating_sub(t)),
            None => 0,
        }
    }

    /// Advance the fuse and the explosion lifetime
    pub fn advance(&mut self, now_ms: u64) -> BombTransitions {
        let mut out = BombTransitions::default();

        if let Some(bomb) = self.bomb
            && now_ms.saturating_sub(bomb.placed_ms) >= self.fuse_ms
        {
            self.explosion = Some(Explosion {
                pos: bomb.pos,
                started_ms: now_ms,
            });
            self.bomb = None;
            out.detonated = Some(bomb.pos);
        }

        if let Some(explosion) = self.explosion
            && now_ms.saturating_sub(explosion.started_ms) >= self.explosion_ms
        {
            self.explosion = None;
            out.expired = true;
        }

        out
    }

    /// Damage every unit inside a live explosion. Returns the number hit.
    pub fn blast(&self, entities: &mut [Entity]) -> usize {
        let Some(explosion) = self.explosion else {
            return 0;
        };
        let mut hits = 0;
        for unit in entities.iter_mut().filter(|e| !e.is_dead()) {
            if within_range(unit.pos, explosion.pos, self.radius) {
                unit.take_damage(self.damage);
                hits += 1;
            }
        }
        hits
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        self.damage += 25;
        self.radius += 20.0;
        log::info!(
            "Bomb upgraded - level {}, damage {}, radius {}",
            self.level,
            self.damage,
            self.radius
        );
    }
}

/// Health regeneration driven by health upgrades
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Regen {
    pub level: u32,
    /// Health restored every [`REGEN_INTERVAL_MS`]
    pub amount: i32,
    pub last_ms: u64,
}

/// What the town centre did during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TownReport {
    pub laser_hit: Option<u32>,
    pub bomb: BombTransitions,
    pub blast_hits: usize,
    pub regenerated: i32,
}

/// The defended structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TownCentre {
    pub pos: DVec2,
    pub radius: f64,
    pub health: i32,
    pub max_health: i32,
    pub laser: Laser,
    pub bombs: BombLauncher,
    pub anti_grav: AntiGrav,
    pub regen: Regen,
}

impl TownCentre {
    pub fn new(pos: DVec2) -> Self {
        Self {
            pos,
            radius: TOWN_RADIUS,
            health: TOWN_MAX_HEALTH,
            max_health: TOWN_MAX_HEALTH,
            laser: Laser::default(),
            bombs: BombLauncher::default(),
            anti_grav: AntiGrav::default(),
            regen: Regen::default(),
        }
    }

    /// Laser, bomb timers, explosion damage, then regen
    pub fn update(&mut self, entities: &mut [Entity], now_ms: u64) -> TownReport {
        let laser_hit = self.laser.update(self.pos, entities, now_ms);
        let bomb = self.bombs.advance(now_ms);
        let blast_hits = self.bombs.blast(entities);
        let regenerated = self.apply_regen(now_ms);
        TownReport {
            laser_hit,
            bomb,
            blast_hits,
            regenerated,
        }
    }

    fn apply_regen(&mut self, now_ms: u64) -> i32 {
        if self.regen.amount <= 0 || now_ms.saturating_sub(self.regen.last_ms) < REGEN_INTERVAL_MS {
            return 0;
        }
        let before = self.health;
        self.health = (self.health + self.regen.amount).min(self.max_health);
        self.regen.last_ms = now_ms;
        self.health - before
    }

    /// Contact damage; health never drops below zero
    pub fn take_damage(&mut self, damage: i32) {
        self.health = (self.health - damage).max(0);
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0
    }

    /// +100 max health and a matching heal; every third level adds +1 regen
    pub fn upgrade_health(&mut self) -> i32 {
        self.regen.level += 1;
        self.max_health += 100;
        self.health = (self.health + 100).min(self.max_health);
        if self.regen.level.is_multiple_of(3) {
            self.regen.amount += 1;
        }
        log::info!(
            "Health upgraded - max {}, current {}, regen {} per {}s",
            self.max_health,
            self.health,
            self.regen.amount,
            REGEN_INTERVAL_MS / 1000
        );
        self.regen.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Variant;

    fn unit(id: u32, x: f64, y: f64) -> Entity {
        Entity::new(id, Variant::Star, DVec2::new(x, y), 1.0)
    }

    #[test]
    fn test_laser_hits_nearest_in_range() {
        let mut laser = Laser::default();
        let mut units = vec![unit(1, 90.0, 0.0), unit(2, 0.0, 40.0), unit(3, 200.0, 0.0)];
        let hit = laser.update(DVec2::ZERO, &mut units, 1000);
        assert_eq!(hit, Some(2));
        assert_eq!(units[1].health, 10);
        assert_eq!(units[0].health, 20);
        assert_eq!(laser.target, Some(2));
        assert_eq!(laser.last_fire_ms, 1000);
    }

    #[test]
    fn test_laser_ignores_out_of_range() {
        let mut laser = Laser::default();
        let mut units = vec![unit(1, 101.0, 0.0)];
        assert_eq!(laser.update(DVec2::ZERO, &mut units, 5000), None);
        assert_eq!(units[0].health, 20);
        assert!(laser.line.is_none());
    }

    #[test]
    fn test_laser_respects_cooldown_and_clears_beam() {
        let mut laser = Laser::default();
        let mut units = vec![unit(1, 10.0, 0.0)];
        assert!(laser.update(DVec2::ZERO, &mut units, 1000).is_some());

        // beam still visible inside the 100ms window
        assert!(laser.update(DVec2::ZERO, &mut units, 1050).is_none());
        assert!(laser.line.is_some());

        // cleared after 100ms, still cooling down
        assert!(laser.update(DVec2::ZERO, &mut units, 1100).is_none());
        assert!(laser.line.is_none());
        assert_eq!(units[0].health, 10);

        assert!(laser.update(DVec2::ZERO, &mut units, 2000).is_some());
        assert_eq!(units[0].health, 0);
    }

    #[test]
    fn test_laser_upgrade_floors_cooldown() {
        let mut laser = Laser::default();
        for _ in 0..20 {
            laser.upgrade();
        }
        assert_eq!(laser.level, 21);
        assert_eq!(laser.damage, 110);
        assert_eq!(laser.cooldown_ms, 100);
        assert_eq!(laser.range, 140.0);
    }

    #[test]
    fn test_bomb_lifecycle_window() {
        let mut bombs = BombLauncher::default();
        let mut units = vec![unit(1, 50.0, 0.0)];
        bombs.place(DVec2::ZERO, 0).unwrap();

        // fuse burning: no damage
        for t in (0..2000).step_by(16) {
            let tr = bombs.advance(t);
            assert_eq!(tr, BombTransitions::default());
            assert_eq!(bombs.blast(&mut units), 0);
        }
        assert_eq!(units[0].health, 20);

        let tr = bombs.advance(2000);
        assert_eq!(tr.detonated, Some(DVec2::ZERO));
        assert!(bombs.bomb.is_none());
        assert_eq!(bombs.blast(&mut units), 1);
        assert_eq!(units[0].health, -30);

        assert_eq!(bombs.advance(2999), BombTransitions::default());
        assert!(bombs.explosion.is_some());

        let tr = bombs.advance(3000);
        assert!(tr.expired);
        assert!(bombs.explosion.is_none());
        assert_eq!(bombs.blast(&mut units), 0);
    }

    #[test]
    fn test_bomb_single_slot() {
        let mut bombs = BombLauncher::default();
        bombs.place(DVec2::ZERO, 0).unwrap();
        assert_eq!(bombs.place(DVec2::ONE, 10), Err(ActionError::BombArmed));
        assert_eq!(bombs.bomb.map(|b| b.pos), Some(DVec2::ZERO));
    }

    #[test]
    fn test_bomb_cooldown_remaining() {
        let mut bombs = BombLauncher::default();
        assert_eq!(bombs.cooldown_remaining(0), 0);
        bombs.place(DVec2::ZERO, 1000).unwrap();
        assert_eq!(bombs.cooldown_remaining(2000), 4000);
        assert_eq!(bombs.cooldown_remaining(7000), 0);
    }

    #[test]
    fn test_bomb_upgrade_keeps_timers() {
        let mut bombs = BombLauncher::default();
        bombs.upgrade();
        assert_eq!(bombs.level, 2);
        assert_eq!(bombs.damage, 75);
        assert_eq!(bombs.radius, 120.0);
        assert_eq!(bombs.fuse_ms, BOMB_FUSE_MS);
        assert_eq!(bombs.explosion_ms, EXPLOSION_DURATION_MS);
        assert_eq!(bombs.cost, BOMB_COST);
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut town = TownCentre::new(DVec2::ZERO);
        town.take_damage(1500);
        assert_eq!(town.health, 0);
        assert!(town.is_destroyed());
    }

    #[test]
    fn test_health_upgrade_and_regen() {
        let mut town = TownCentre::new(DVec2::ZERO);
        town.take_damage(400);
        assert_eq!(town.upgrade_health(), 0);
        assert_eq!(town.max_health, 1100);
        assert_eq!(town.health, 700);
        town.upgrade_health();
        assert_eq!(town.upgrade_health(), 1);
        assert_eq!(town.max_health, 1300);
        assert_eq!(town.health, 900);

        let mut units: Vec<Entity> = Vec::new();
        let report = town.update(&mut units, 10_000);
        assert_eq!(report.regenerated, 1);
        assert_eq!(town.health, 901);

        // next regen only after the interval
        assert_eq!(town.update(&mut units, 11_999).regenerated, 0);
        assert_eq!(town.update(&mut units, 12_000).regenerated, 1);
    }

    #[test]
    fn test_regen_caps_at_max_health() {
        let mut town = TownCentre::new(DVec2::ZERO);
        for _ in 0..3 {
            town.upgrade_health();
        }
        assert_eq!(town.health, town.max_health);
        let report = town.update(&mut [], 5000);
        assert_eq!(report.regenerated, 0);
        assert_eq!(town.health, town.max_health);
    }
}
