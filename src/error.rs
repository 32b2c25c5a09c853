//! Error types.
//!
//! Nothing in the simulation itself can fail: the only fatal condition is the
//! town centre falling, and that is a normal [`GamePhase::GameOver`]. What can
//! fail is a player request (rejected, state untouched) and loading settings.
//!
//! [`GamePhase::GameOver`]: crate::sim::GamePhase::GameOver

use std::fmt;

/// Why a player action was refused. A refused action changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionError {
    /// The ledger cannot cover the cost.
    InsufficientResources {
        /// Cost of the action.
        cost: i64,
        /// Resources on hand.
        available: i64,
    },
    /// Anti-grav must be activated before it can be upgraded.
    AntiGravInactive,
    /// Anti-grav is already running.
    AntiGravAlreadyActive,
    /// There are no drones to upgrade.
    NoDrones,
    /// A bomb is already armed; the town centre holds one at a time.
    BombArmed,
    /// The bomb launcher has not recharged yet.
    BombCoolingDown {
        /// Milliseconds until the next bomb may be placed.
        remaining_ms: u64,
    },
    /// The town centre has fallen.
    GameOver,
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::InsufficientResources { cost, available } => write!(
                f,
                "not enough resources: need {}, have {}",
                cost, available
            ),
            ActionError::AntiGravInactive => write!(f, "anti-grav needs to be activated first"),
            ActionError::AntiGravAlreadyActive => write!(f, "anti-grav is already active"),
            ActionError::NoDrones => write!(f, "no drones to upgrade"),
            ActionError::BombArmed => write!(f, "a bomb is already armed"),
            ActionError::BombCoolingDown { remaining_ms } => {
                write!(f, "bomb launcher recharging ({} ms left)", remaining_ms)
            }
            ActionError::GameOver => write!(f, "the town centre has fallen"),
        }
    }
}

impl std::error::Error for ActionError {}

/// Settings could not be loaded.
#[derive(Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    Io(std::io::Error),
    /// The settings file is not valid JSON for [`crate::Settings`].
    Parse(serde_json::Error),
    /// A value parsed but is unusable.
    Invalid {
        /// Offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read settings: {}", e),
            ConfigError::Parse(e) => write!(f, "failed to parse settings: {}", e),
            ConfigError::Invalid { field, reason } => {
                write!(f, "invalid setting '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Convenience alias for player actions.
pub type ActionResult<T> = Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_messages() {
        let e = ActionError::InsufficientResources {
            cost: 200,
            available: 15,
        };
        assert_eq!(e.to_string(), "not enough resources: need 200, have 15");
        assert_eq!(
            ActionError::AntiGravInactive.to_string(),
            "anti-grav needs to be activated first"
        );
    }

    #[test]
    fn test_config_error_wraps_parse_error() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let e = ConfigError::from(parse);
        assert!(e.to_string().starts_with("failed to parse settings"));
        assert!(std::error::Error::source(&e).is_some());
    }
}
