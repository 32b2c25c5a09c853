//! Anti-grav slow field
//!
//! A circle around the town centre that scales the speed of any unit inside
//! it. The scale is handed to the mover for a single step; nothing on the unit
//! is rewritten, so it cannot compound across ticks.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::within_range;
use crate::consts::{ANTI_GRAV_MIN_SLOW, ANTI_GRAV_RADIUS, ANTI_GRAV_SLOW};
use crate::error::{ActionError, ActionResult};

const RADIUS_STEP: f64 = 25.0;
const SLOW_STEP: f64 = 0.1;

/// Anti-grav field state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AntiGrav {
    pub active: bool,
    pub radius: f64,
    /// Speed multiplier inside the field, always in `[0.1, 1.0)`
    pub slow: f64,
    pub level: u32,
}

impl Default for AntiGrav {
    fn default() -> Self {
        Self {
            active: false,
            radius: ANTI_GRAV_RADIUS,
            slow: ANTI_GRAV_SLOW,
            level: 1,
        }
    }
}

impl AntiGrav {
    /// Speed multiplier for a unit at `pos`, with the field centred on `centre`
    pub fn multiplier(&self, pos: DVec2, centre: DVec2) -> f64 {
        if self.active && within_range(pos, centre, self.radius) {
            self.slow
        } else {
            1.0
        }
    }

    pub fn activate(&mut self) -> ActionResult<()> {
        if self.active {
            return Err(ActionError::AntiGravAlreadyActive);
        }
        self.active = true;
        log::info!("AntiGrav activated (radius {}, slow {:.0}%)", self.radius, self.slow * 100.0);
        Ok(())
    }

    /// Widen the field and deepen the slow, down to the floor
    pub fn upgrade(&mut self) -> ActionResult<()> {
        if !self.active {
            return Err(ActionError::AntiGravInactive);
        }
        self.level += 1;
        self.radius += RADIUS_STEP;
        self.slow = (self.slow - SLOW_STEP).max(ANTI_GRAV_MIN_SLOW);
        log::info!(
            "AntiGrav upgraded - level {}, speed {:.1}%, radius {}",
            self.level,
            self.slow * 100.0,
            self.radius
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_inactive_field_never_slows() {
        let field = AntiGrav::default();
        assert_eq!(field.multiplier(DVec2::ZERO, DVec2::ZERO), 1.0);
    }

    #[test]
    fn test_active_field_slows_inside_radius_only() {
        let mut field = AntiGrav::default();
        field.activate().unwrap();
        let centre = DVec2::new(600.0, 450.0);
        assert_eq!(field.multiplier(centre + DVec2::new(150.0, 0.0), centre), 0.5);
        assert_eq!(field.multiplier(centre + DVec2::new(150.5, 0.0), centre), 1.0);
    }

    #[test]
    fn test_activation_and_upgrade_prerequisites() {
        let mut field = AntiGrav::default();
        assert_eq!(field.upgrade(), Err(ActionError::AntiGravInactive));
        assert_eq!(field.level, 1);
        field.activate().unwrap();
        assert_eq!(field.activate(), Err(ActionError::AntiGravAlreadyActive));
    }

    #[test]
    fn test_upgrade_floors_slow() {
        let mut field = AntiGrav::default();
        field.activate().unwrap();
        for _ in 0..10 {
            field.upgrade().unwrap();
        }
        assert_eq!(field.level, 11);
        assert_eq!(field.radius, 150.0 + 250.0);
        assert!((field.slow - 0.1).abs() < 1e-12);
        assert!(field.slow > 0.0);
    }

    proptest! {
        #[test]
        fn prop_multiplier_matches_radius(
            d in 0.0f64..400.0,
            theta in -3.14f64..3.14,
            radius in 10.0f64..300.0,
            slow in 0.1f64..0.99,
        ) {
            let field = AntiGrav { active: true, radius, slow, level: 1 };
            let centre = DVec2::new(600.0, 450.0);
            let pos = centre + crate::polar_offset(d, theta);
            let m = field.multiplier(pos, centre);
            if pos.distance(centre) <= radius {
                prop_assert_eq!(m, slow);
            } else {
                prop_assert_eq!(m, 1.0);
            }
        }
    }
}
