//! Error types
//!
//! Two families: [`ConfigError`] stops a session from being built at all,
//! [`RejectedAction`] refuses a single player decision and leaves the session
//! untouched so the caller can ask again.

use thiserror::Error;

/// Problems with session setup, reported before any combat state exists
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read encounter file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed encounter data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no encounters configured")]
    NoEncounters,

    #[error("player name is empty")]
    EmptyPlayerName,

    #[error("encounter #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("'{name}' must have positive max health (got {max_health})")]
    NonPositiveHealth { name: String, max_health: i32 },

    #[error("weapon '{weapon}' carried by '{owner}' has negative base damage ({damage})")]
    NegativeDamage {
        owner: String,
        weapon: String,
        damage: i32,
    },

    #[error(
        "weapon '{weapon}' needs a critical chance in 0..=1 and a multiplier of at least 1 \
         (got {chance} and {multiplier})"
    )]
    InvalidCritical {
        weapon: String,
        chance: f64,
        multiplier: f64,
    },

    #[error("{name} must be a probability between 0 and 1 (got {value})")]
    InvalidProbability { name: &'static str, value: f64 },
}

/// A player decision the engine refused. The turn is not consumed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectedAction {
    #[error("You can't run from a boss battle!")]
    CannotFleeBoss,

    #[error("the session is over")]
    SessionOver,

    #[error("the session has not started")]
    NotStarted,
}
