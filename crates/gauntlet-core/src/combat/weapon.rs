//! Weapons and damage rolls

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CRIT_CHANCE, DEFAULT_CRIT_MULTIPLIER, WEAPON_UPGRADE_STEP};
use crate::rng::RandomSource;

/// A weapon wielded by a combatant.
///
/// Critical chance is kept in `[0, 1]` and the multiplier at or above `1.0`;
/// the setters clamp silently instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    base_damage: i32,
    critical_chance: f64,
    critical_multiplier: f64,
    /// Whether the most recent roll landed a critical hit
    #[serde(skip)]
    last_hit_was_critical: bool,
}

impl Weapon {
    /// Create a weapon with the default 10% / x2.0 critical profile
    pub fn new(name: impl Into<String>, base_damage: i32) -> Self {
        Self::with_critical(name, base_damage, DEFAULT_CRIT_CHANCE, DEFAULT_CRIT_MULTIPLIER)
    }

    pub fn with_critical(
        name: impl Into<String>,
        base_damage: i32,
        critical_chance: f64,
        critical_multiplier: f64,
    ) -> Self {
        let mut weapon = Self {
            name: name.into(),
            base_damage: base_damage.max(0),
            critical_chance: 0.0,
            critical_multiplier: 1.0,
            last_hit_was_critical: false,
        };
        weapon.set_critical_chance(critical_chance);
        weapon.set_critical_multiplier(critical_multiplier);
        weapon
    }

    pub fn base_damage(&self) -> i32 {
        self.base_damage
    }

    pub fn critical_chance(&self) -> f64 {
        self.critical_chance
    }

    pub fn critical_multiplier(&self) -> f64 {
        self.critical_multiplier
    }

    pub fn last_hit_was_critical(&self) -> bool {
        self.last_hit_was_critical
    }

    /// Roll damage for one swing.
    ///
    /// Always consumes exactly one draw for the critical check.
    pub fn roll_damage(&mut self, rng: &mut dyn RandomSource) -> i32 {
        self.last_hit_was_critical = rng.chance(self.critical_chance);
        if self.last_hit_was_critical {
            (self.base_damage as f64 * self.critical_multiplier) as i32
        } else {
            self.base_damage
        }
    }

    /// Increase base damage by `amount`
    pub fn upgrade(&mut self, amount: i32) {
        self.base_damage = self.base_damage.saturating_add(amount).max(0);
    }

    /// Upgrade by the standard level-up step
    pub fn upgrade_default(&mut self) {
        self.upgrade(WEAPON_UPGRADE_STEP);
    }

    /// Multiply base damage, truncating toward zero
    pub fn scale_damage(&mut self, factor: f64) {
        self.base_damage = (self.base_damage as f64 * factor) as i32;
    }

    pub fn set_critical_chance(&mut self, chance: f64) {
        // NaN would slip through clamp
        self.critical_chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
    }

    pub fn set_critical_multiplier(&mut self, multiplier: f64) {
        self.critical_multiplier = if multiplier.is_nan() { 1.0 } else { multiplier.max(1.0) };
    }

    pub(crate) fn set_last_hit_critical(&mut self, critical: bool) {
        self.last_hit_was_critical = critical;
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} damage", self.name, self.base_damage)?;
        if self.critical_chance > 0.0 {
            write!(
                f,
                ") (Crit: {:.0}% x{}",
                self.critical_chance * 100.0,
                self.critical_multiplier
            )?;
        }
        write!(f, ")")
    }
}
