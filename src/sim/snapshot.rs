//! Read-only view of the game for renderers and HUDs.
//!
//! Built from the state after a tick; never feeds back into the simulation.

use glam::DVec2;
use serde::Serialize;

use super::entity::Variant;
use super::state::{GamePhase, GameState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitView {
    pub id: u32,
    pub variant: Variant,
    pub pos: DVec2,
    pub health: i32,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TownView {
    pub pos: DVec2,
    pub radius: f64,
    pub health: i32,
    pub max_health: i32,
    pub anti_grav_active: bool,
    pub anti_grav_radius: f64,
    /// Laser beam, while visible
    pub laser: Option<(DVec2, DVec2)>,
    /// Armed bomb position
    pub bomb: Option<DVec2>,
    pub bomb_radius: f64,
    /// Explosion centre and how far through its lifetime it is (0..1)
    pub explosion: Option<(DVec2, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroneView {
    pub pos: DVec2,
    pub angle: f64,
    pub laser: Option<(DVec2, DVec2)>,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub time_ms: u64,
    pub phase: GamePhase,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next_level: u32,
    pub units: Vec<UnitView>,
    pub town: TownView,
    pub drones: Vec<DroneView>,
}

/// Build a snapshot of the current state
pub fn build_snapshot(state: &GameState) -> Snapshot {
    let now = state.now_ms;
    let town = &state.town;
    let bombs = &town.bombs;

    let explosion = bombs.explosion.map(|e| {
        let elapsed = now.saturating_sub(e.started_ms) as f64;
        (e.pos, (elapsed / bombs.explosion_ms as f64).clamp(0.0, 1.0))
    });

    Snapshot {
        tick: state.time_ticks,
        time_ms: now,
        phase: state.phase,
        level: state.progression.level,
        xp: state.progression.xp,
        xp_to_next_level: state.progression.xp_to_next_level,
        units: state
            .entities
            .iter()
            .map(|e| UnitView {
                id: e.id,
                variant: e.variant,
                pos: e.pos,
                health: e.health,
                radius: e.radius,
            })
            .collect(),
        town: TownView {
            pos: town.pos,
            radius: town.radius,
            health: town.health,
            max_health: town.max_health,
            anti_grav_active: town.anti_grav.active,
            anti_grav_radius: town.anti_grav.radius,
            laser: town.laser.line,
            bomb: bombs.bomb.map(|b| b.pos),
            bomb_radius: bombs.radius,
            explosion,
        },
        drones: state
            .drones
            .iter()
            .map(|d| DroneView {
                pos: d.pos,
                angle: d.angle,
                laser: d.laser_line(now),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::SimConfig;
    use crate::sim::tick::{PlayerAction, apply_action, tick};

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(SimConfig::default());
        apply_action(&mut state, PlayerAction::ActivateAntiGrav, 0).unwrap();
        apply_action(&mut state, PlayerAction::SpawnDrone, 0).unwrap();
        for k in 1..=120u64 {
            tick(&mut state, k * 16);
        }
        let snap = build_snapshot(&state);
        assert_eq!(snap.tick, 120);
        assert_eq!(snap.units.len(), state.entities.len());
        assert_eq!(snap.drones.len(), 1);
        assert!(snap.town.anti_grav_active);
        assert_eq!(snap.town.health, 1000);
        assert_eq!(snap.level, 1);
    }

    #[test]
    fn test_explosion_progress() {
        let mut state = GameState::new(SimConfig::default());
        apply_action(&mut state, PlayerAction::PlaceBomb { x: 10.0, y: 20.0 }, 0).unwrap();
        tick(&mut state, 1000);
        let snap = build_snapshot(&state);
        assert_eq!(snap.town.bomb, Some(DVec2::new(10.0, 20.0)));
        assert!(snap.town.explosion.is_none());

        tick(&mut state, 2000);
        tick(&mut state, 2500);
        let snap = build_snapshot(&state);
        assert_eq!(snap.town.bomb, None);
        let (pos, progress) = snap.town.explosion.unwrap();
        assert_eq!(pos, DVec2::new(10.0, 20.0));
        assert!((progress - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(SimConfig::default());
        let json = serde_json::to_string(&build_snapshot(&state)).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
    }
}
