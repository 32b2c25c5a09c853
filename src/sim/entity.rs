//! Hostile units
//!
//! Every unit shares one record; the variant picks a stat row and a movement
//! hook layered on top of the straight-line steering toward the town centre.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::circles_touch;
use crate::consts::SPAWN_PADDING;
use crate::heading_to;

/// Unit shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Triangle,
    Square,
    Circle,
    Diamond,
    Star,
    Spider,
}

impl Variant {
    /// Every variant, in spawn-roll order
    pub const ALL: [Variant; 6] = [
        Variant::Triangle,
        Variant::Square,
        Variant::Circle,
        Variant::Diamond,
        Variant::Star,
        Variant::Spider,
    ];

    /// Stat row for this variant
    pub const fn stats(self) -> VariantStats {
        match self {
            Variant::Triangle => VariantStats {
                base_speed: 1.0,
                damage: 5,
                value: 1,
                health: 10,
                radius: 15.0,
                behavior: Behavior::Wobble,
            },
            Variant::Square => VariantStats {
                base_speed: 0.8,
                damage: 8,
                value: 2,
                health: 15,
                radius: 12.0,
                behavior: Behavior::Steady,
            },
            Variant::Circle => VariantStats {
                base_speed: 1.2,
                damage: 3,
                value: 1,
                health: 8,
                radius: 20.0,
                behavior: Behavior::Orbit,
            },
            Variant::Diamond => VariantStats {
                base_speed: 0.9,
                damage: 6,
                value: 3,
                health: 12,
                radius: 15.0,
                behavior: Behavior::Steady,
            },
            Variant::Star => VariantStats {
                base_speed: 0.7,
                damage: 10,
                value: 5,
                health: 20,
                radius: 10.0,
                behavior: Behavior::Burst {
                    chance: 0.01,
                    factor: 5.0,
                },
            },
            Variant::Spider => VariantStats {
                base_speed: 1.0,
                damage: 5,
                value: 1,
                health: 10,
                radius: 15.0,
                behavior: Behavior::Steady,
            },
        }
    }
}

/// Per-variant movement modifier applied after (or instead of) the base step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    /// Straight line toward the target
    Steady,
    /// Small clock-driven sway on top of the base step
    Wobble,
    /// Slow circular drift; the forward step runs at 90%
    Orbit,
    /// Per-tick chance of an extra dash of `base_speed * factor`
    Burst { chance: f64, factor: f64 },
}

/// Stat row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantStats {
    pub base_speed: f64,
    pub damage: i32,
    pub value: i32,
    pub health: i32,
    pub radius: f64,
    pub behavior: Behavior,
}

/// Orbit phase advance per tick (radians)
const ORBIT_PHASE_STEP: f64 = 0.02;
/// Orbit offset magnitude and how much of it leaks into the step
const ORBIT_OFFSET: f64 = 1.5;
const ORBIT_BLEND: f64 = 0.1;
/// Share of the forward step an orbiting unit keeps
const ORBIT_FORWARD: f64 = 0.9;
/// Wobble frequency (per ms) and magnitude (pixels)
const WOBBLE_FREQ: f64 = 0.01;
const WOBBLE_AMPLITUDE: f64 = 0.1;

/// A hostile unit
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: u32,
    pub variant: Variant,
    pub pos: DVec2,
    /// Variant speed before progression scaling
    pub base_speed: f64,
    /// Speed assigned at spawn (`base_speed * speed_multiplier`)
    pub speed: f64,
    pub health: i32,
    /// Damage dealt to the town centre on contact
    pub damage: i32,
    /// Resources paid out when the unit is removed
    pub value: i32,
    pub radius: f64,
    /// Orbit hook state
    pub orbit_phase: f64,
}

impl Entity {
    /// Build a unit of `variant` at `pos` with its speed scaled by progression
    pub fn new(id: u32, variant: Variant, pos: DVec2, speed_multiplier: f64) -> Self {
        let stats = variant.stats();
        Self {
            id,
            variant,
            pos,
            base_speed: stats.base_speed,
            speed: stats.base_speed * speed_multiplier,
            health: stats.health,
            damage: stats.damage,
            value: stats.value,
            radius: stats.radius,
            orbit_phase: 0.0,
        }
    }

    /// Roll a variant and an off-screen position
    pub fn spawn<R: Rng>(id: u32, rng: &mut R, bounds: DVec2, speed_multiplier: f64) -> Self {
        let variant = Variant::ALL[rng.random_range(0..Variant::ALL.len())];
        let pos = spawn_point(rng, bounds, SPAWN_PADDING);
        Self::new(id, variant, pos, speed_multiplier)
    }

    /// Advance one tick toward `target`.
    ///
    /// `speed_scale` is a transient multiplier (anti-grav) that only affects
    /// this step; `self.speed` is never written.
    pub fn advance<R: Rng>(&mut self, target: DVec2, speed_scale: f64, now_ms: u64, rng: &mut R) {
        let speed = self.speed * speed_scale;
        let heading = heading_to(self.pos, target);
        let forward = DVec2::new(heading.cos(), heading.sin());

        match self.variant.stats().behavior {
            Behavior::Steady => {
                self.pos += forward * speed;
            }
            Behavior::Wobble => {
                self.pos += forward * speed;
                let t = now_ms as f64 * WOBBLE_FREQ;
                self.pos += DVec2::new(t.sin(), t.cos()) * WOBBLE_AMPLITUDE;
            }
            Behavior::Orbit => {
                self.orbit_phase += ORBIT_PHASE_STEP;
                let offset = DVec2::new(self.orbit_phase.sin(), self.orbit_phase.cos()) * ORBIT_OFFSET;
                self.pos += forward * speed * ORBIT_FORWARD + offset * ORBIT_BLEND;
            }
            Behavior::Burst { chance, factor } => {
                self.pos += forward * speed;
                if rng.random_bool(chance) {
                    let heading = heading_to(self.pos, target);
                    self.pos += DVec2::new(heading.cos(), heading.sin()) * self.base_speed * factor;
                }
            }
        }
    }

    /// Apply combat damage. Returns true if this destroyed the unit.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.is_dead()
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// True if the unit overlaps a circle (the town centre)
    #[inline]
    pub fn touches(&self, centre: DVec2, radius: f64) -> bool {
        circles_touch(self.pos, self.radius, centre, radius)
    }
}

/// Random point just outside one of the four screen edges.
///
/// The edge is uniform; the coordinate along the edge is uniform over the
/// screen's width or height.
pub fn spawn_point<R: Rng>(rng: &mut R, bounds: DVec2, padding: f64) -> DVec2 {
    match rng.random_range(0..4u8) {
        // top
        0 => DVec2::new(rng.random_range(0.0..=bounds.x), -padding),
        // right
        1 => DVec2::new(bounds.x + padding, rng.random_range(0.0..=bounds.y)),
        // bottom
        2 => DVec2::new(rng.random_range(0.0..=bounds.x), bounds.y + padding),
        // left
        _ => DVec2::new(-padding, rng.random_range(0.0..=bounds.y)),
    }
}
