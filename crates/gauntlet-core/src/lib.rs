//! gauntlet-core: combat engine for a turn-based encounter gauntlet
//!
//! This crate contains all game logic with no terminal I/O.
//! Randomness is injected through [`RandomSource`] and everything the player
//! should see is reported through an [`EventSink`], so a whole session can be
//! replayed and asserted on in tests.

pub mod combat;
pub mod config;
pub mod encounter;
pub mod error;
pub mod event;
pub mod session;

mod consts;
mod rng;

pub use combat::{AttackOutcome, BossExtension, Combatant, StatusKind, Weapon};
pub use config::{PlayerDef, SessionConfig, Tuning, WeaponDef};
pub use consts::*;
pub use encounter::{EncounterDef, EncounterQueue, default_campaign, load_encounters};
pub use error::{ConfigError, RejectedAction};
pub use event::{EventSink, GameEvent};
pub use rng::{GameRng, RandomSource, ScriptedRng};
pub use session::{
    DecisionSource, Outcome, Phase, PlayerAction, RoundResult, Session, TurnView,
};
