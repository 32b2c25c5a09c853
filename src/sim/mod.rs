//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed tick only; one call to [`tick`] per frame
//! - Cooldowns, fuses and regen read the millisecond clock handed to `tick`;
//!   the spawn timer and burst rolls count frames
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod drone;
pub mod entity;
pub mod field;
pub mod progression;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod town_centre;

pub use drone::{Drone, DroneContext, update_drones};
pub use entity::{Behavior, Entity, Variant, VariantStats};
pub use field::AntiGrav;
pub use progression::LevelManager;
pub use snapshot::{Snapshot, build_snapshot};
pub use state::{GamePhase, GameState, SimConfig};
pub use tick::{GameEvent, PlayerAction, TickReport, apply_action, tick};
pub use town_centre::{Bomb, BombLauncher, Explosion, Laser, TownCentre};
