//! Combat system
//!
//! Weapons, combatants, boss mechanics and status effects. Everything here is
//! pure state manipulation; turn order and event reporting live in
//! [`crate::session`].

mod boss;
mod combatant;
mod status;
mod weapon;

pub use boss::BossExtension;
pub use combatant::{AttackOutcome, Combatant};
pub use status::{Burn, StatusEffectTarget, StatusEffects, StatusKind, StatusTick};
pub use weapon::Weapon;
