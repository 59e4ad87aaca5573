//! Status effects inflicted by boss special attacks
//!
//! Only combatants that carry a [`StatusEffects`] block can be burned or
//! stunned; everyone else exposes no [`StatusEffectTarget`] and the follow-up
//! effect of a special attack is skipped.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Kinds of status effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum StatusKind {
    Burn,
    Stun,
}

/// Capability of receiving status effects
pub trait StatusEffectTarget {
    /// Burn for `damage` per turn over `turns` turns
    fn apply_burn(&mut self, damage: i32, turns: u32);

    /// Skip the next `turns` turns
    fn apply_stun(&mut self, turns: u32);
}

/// Damage over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Burn {
    pub damage_per_turn: i32,
    pub turns_left: u32,
}

/// What happened when effects were ticked at the start of a turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTick {
    /// Burn damage to apply this turn
    pub burn_damage: i32,
    /// The burn ran out with this tick
    pub burn_expired: bool,
    /// The turn is lost to a stun
    pub stunned: bool,
    /// The stun ran out with this tick
    pub stun_expired: bool,
}

/// Active status effects on one combatant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffects {
    burn: Option<Burn>,
    stun_turns: u32,
}

impl StatusEffects {
    pub const fn new() -> Self {
        Self {
            burn: None,
            stun_turns: 0,
        }
    }

    pub fn burn(&self) -> Option<Burn> {
        self.burn
    }

    pub fn is_stunned(&self) -> bool {
        self.stun_turns > 0
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        match kind {
            StatusKind::Burn => self.burn.is_some(),
            StatusKind::Stun => self.is_stunned(),
        }
    }

    /// Advance every effect by one turn
    pub fn tick(&mut self) -> StatusTick {
        let mut tick = StatusTick::default();

        if let Some(burn) = self.burn.as_mut() {
            tick.burn_damage = burn.damage_per_turn;
            burn.turns_left = burn.turns_left.saturating_sub(1);
            if burn.turns_left == 0 {
                self.burn = None;
                tick.burn_expired = true;
            }
        }

        if self.stun_turns > 0 {
            tick.stunned = true;
            self.stun_turns -= 1;
            tick.stun_expired = self.stun_turns == 0;
        }

        tick
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl StatusEffectTarget for StatusEffects {
    fn apply_burn(&mut self, damage: i32, turns: u32) {
        if damage <= 0 || turns == 0 {
            return;
        }
        // A fresh burn replaces the old one unless the old one hurts more
        match self.burn {
            Some(existing) if existing.damage_per_turn > damage => {
                self.burn = Some(Burn {
                    damage_per_turn: existing.damage_per_turn,
                    turns_left: existing.turns_left.max(turns),
                });
            }
            _ => {
                self.burn = Some(Burn {
                    damage_per_turn: damage,
                    turns_left: turns,
                });
            }
        }
    }

    fn apply_stun(&mut self, turns: u32) {
        self.stun_turns = self.stun_turns.max(turns);
    }
}
