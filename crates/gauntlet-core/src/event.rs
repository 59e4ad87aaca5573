//! Structured game events
//!
//! The session never prints. Everything a player should see is emitted as a
//! [`GameEvent`] into an [`EventSink`] supplied by the host.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::StatusKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// One attack resolved, including attacks that dealt 0 damage
    Combat {
        attacker: String,
        defender: String,
        damage: i32,
        critical: bool,
    },
    /// Health restored. `target` is `None` when the healer healed itself.
    Heal {
        healer: String,
        amount: i32,
        target: Option<String>,
    },
    /// A status effect was applied (`applied`) or wore off
    Status {
        character: String,
        effect: StatusKind,
        applied: bool,
    },
    /// Free-form story text
    Narrative(String),
}

impl GameEvent {
    pub fn narrative(text: impl Into<String>) -> Self {
        GameEvent::Narrative(text.into())
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::Combat {
                attacker,
                defender,
                damage,
                ..
            } => write!(f, "{attacker} attacks {defender} for {damage} damage"),
            GameEvent::Heal {
                healer,
                amount,
                target,
            } => {
                let target = target.as_deref().unwrap_or("themselves");
                write!(f, "{healer} heals {target} for {amount} health")
            }
            GameEvent::Status {
                character,
                effect,
                applied,
            } => {
                let action = if *applied { "gains" } else { "loses" };
                write!(f, "{character} {action} {effect}!")
            }
            GameEvent::Narrative(text) => f.write_str(text),
        }
    }
}

/// Receiver for game events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// In-memory event log
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}
