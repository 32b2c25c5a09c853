//! Ally drones
//!
//! A drone chases the first unit it detects and zaps it when close enough.
//! With nothing in sight it flocks with the other drones while orbiting the
//! town centre just outside the anti-grav field. Heading eases toward the
//! goal a fraction at a time; the drone always flies at constant speed and
//! wraps around the screen edges.

use glam::DVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, spawn_point};
use crate::consts::*;
use crate::{heading_to, normalize_angle, polar_offset};

/// Position and heading of a flockmate at the start of the tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlockMember {
    pub pos: DVec2,
    pub angle: f64,
}

/// Shared inputs for one drone pass
#[derive(Debug, Clone, Copy)]
pub struct DroneContext {
    pub town_pos: DVec2,
    /// Patrol orbit sits at this radius plus the drone size
    pub anti_grav_radius: f64,
    /// Screen size; positions wrap modulo these
    pub bounds: DVec2,
    pub now_ms: u64,
}

/// A player-owned drone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drone {
    pub pos: DVec2,
    /// Current heading (radians)
    pub angle: f64,
    pub speed: f64,
    pub size: f64,
    pub level: u32,

    pub detect_radius: f64,
    pub attack_radius: f64,
    pub laser_damage: i32,
    pub laser_cooldown_ms: u64,
    pub last_shot_ms: u64,
    /// Laser is drawn until this time
    pub laser_end_ms: u64,
    /// Where the last shot landed
    pub laser_target: Option<DVec2>,

    pub separation_distance: f64,
    pub alignment_factor: f64,
    pub cohesion_factor: f64,
    pub patrol_angle: f64,
    pub patrol_speed: f64,
    /// Heading the drone is turning toward
    pub target_angle: f64,
    /// Fraction of the heading error corrected per tick
    pub rotation_speed: f64,
}

impl Drone {
    pub fn new(pos: DVec2, angle: f64) -> Self {
        Self {
            pos,
            angle,
            speed: DRONE_SPEED,
            size: DRONE_SIZE,
            level: 1,
            detect_radius: DRONE_DETECT_RADIUS,
            attack_radius: DRONE_ATTACK_RADIUS,
            laser_damage: DRONE_LASER_DAMAGE,
            laser_cooldown_ms: DRONE_LASER_COOLDOWN_MS,
            last_shot_ms: 0,
            laser_end_ms: 0,
            laser_target: None,
            separation_distance: DRONE_SEPARATION,
            alignment_factor: DRONE_ALIGNMENT,
            cohesion_factor: DRONE_COHESION,
            patrol_angle: 0.0,
            patrol_speed: DRONE_PATROL_SPEED,
            target_angle: angle,
            rotation_speed: DRONE_ROTATION_SPEED,
        }
    }

    /// Enter just outside a random screen edge with a random heading
    pub fn spawn<R: Rng>(rng: &mut R, bounds: DVec2) -> Self {
        let pos = spawn_point(rng, bounds, DRONE_SIZE);
        let angle = rng.random_range(0.0..std::f64::consts::TAU);
        Self::new(pos, angle)
    }

    /// One tick: acquire/attack or flock, turn, move, wrap.
    ///
    /// `flock` holds every drone (this one included, at `index`). Returns the
    /// id of the unit hit, if any.
    pub fn update(
        &mut self,
        index: usize,
        entities: &mut [Entity],
        flock: &[FlockMember],
        ctx: &DroneContext,
    ) -> Option<u32> {
        let mut hit = None;

        let detected = entities
            .iter()
            .position(|e| !e.is_dead() && self.pos.distance(e.pos) <= self.detect_radius);

        match detected {
            Some(i) => {
                let unit = &mut entities[i];
                self.target_angle = heading_to(self.pos, unit.pos);
                let in_reach = self.pos.distance(unit.pos) <= self.attack_radius;
                if in_reach && ctx.now_ms.saturating_sub(self.last_shot_ms) >= self.laser_cooldown_ms {
                    unit.take_damage(self.laser_damage);
                    self.last_shot_ms = ctx.now_ms;
                    self.laser_end_ms = ctx.now_ms + DRONE_LASER_VISIBLE_MS;
                    self.laser_target = Some(unit.pos);
                    hit = Some(unit.id);
                }
            }
            None => self.flock(index, flock, ctx),
        }

        self.turn();

        self.pos += polar_offset(self.speed, self.angle);
        self.pos = DVec2::new(self.pos.x.rem_euclid(ctx.bounds.x), self.pos.y.rem_euclid(ctx.bounds.y));

        hit
    }

    /// Set `target_angle` from separation, alignment, cohesion and the patrol
    /// waypoint, then advance the patrol angle.
    fn flock(&mut self, index: usize, flock: &[FlockMember], ctx: &DroneContext) {
        let mut separation = DVec2::ZERO;
        let mut alignment = DVec2::ZERO;
        let mut cohesion = DVec2::ZERO;
        let mut count = 0u32;

        for (i, other) in flock.iter().enumerate() {
            if i == index {
                continue;
            }
            let distance = self.pos.distance(other.pos);
            if distance < self.separation_distance {
                separation += self.pos - other.pos;
            }
            if distance < self.detect_radius {
                alignment += DVec2::new(other.angle.cos(), other.angle.sin());
                cohesion += other.pos;
                count += 1;
            }
        }

        if count > 0 {
            alignment /= count as f64;
            cohesion = cohesion / count as f64 - self.pos;
        }

        let patrol_radius = ctx.anti_grav_radius + self.size;
        let waypoint = ctx.town_pos + polar_offset(patrol_radius, self.patrol_angle);

        let goal = waypoint
            + separation
            + alignment * self.alignment_factor
            + cohesion * self.cohesion_factor;
        self.target_angle = heading_to(self.pos, goal);

        self.patrol_angle += self.patrol_speed;
    }

    /// Ease the heading toward `target_angle` along the shorter arc
    pub fn turn(&mut self) {
        let diff = normalize_angle(self.target_angle - self.angle);
        if diff.abs() > DRONE_ROTATION_DEADZONE {
            self.angle = normalize_angle(self.angle + diff * self.rotation_speed);
        }
    }

    /// Laser segment to draw at `now_ms`
    pub fn laser_line(&self, now_ms: u64) -> Option<(DVec2, DVec2)> {
        match self.laser_target {
            Some(target) if now_ms < self.laser_end_ms => Some((self.pos, target)),
            _ => None,
        }
    }

    pub fn upgrade(&mut self) {
        self.level += 1;
        self.detect_radius += 20.0;
        self.attack_radius += 15.0;
        self.laser_damage += 5;
        self.laser_cooldown_ms = self
            .laser_cooldown_ms
            .saturating_sub(50)
            .max(DRONE_MIN_COOLDOWN_MS);
    }
}

/// Update every drone against the unit list. Returns ids of units hit.
///
/// Flocking reads the positions and headings the drones had when the pass
/// started, so update order does not matter.
pub fn update_drones(drones: &mut [Drone], entities: &mut [Entity], ctx: &DroneContext) -> Vec<u32> {
    let flock: Vec<FlockMember> = drones
        .iter()
        .map(|d| FlockMember {
            pos: d.pos,
            angle: d.angle,
        })
        .collect();

    let mut hits = Vec::new();
    for (i, drone) in drones.iter_mut().enumerate() {
        if let Some(id) = drone.update(i, entities, &flock, ctx) {
            hits.push(id);
        }
    }
    hits
}
