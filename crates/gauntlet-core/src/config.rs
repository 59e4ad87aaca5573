//! Session configuration
//!
//! Everything a session needs before the first round: the player template,
//! the encounter list and the probability knobs.

use serde::{Deserialize, Serialize};

use crate::combat::{Combatant, Weapon};
use crate::consts::{
    DEFAULT_CRIT_CHANCE, DEFAULT_CRIT_MULTIPLIER, ENRAGED_DOUBLE_STRIKE_CHANCE, FLEE_CHANCE,
    OPPONENT_ATTACK_CHANCE, SPECIAL_ATTACK_CHANCE,
};
use crate::encounter::{EncounterDef, default_campaign};
use crate::error::ConfigError;

/// Probabilities used by the engine and the boss AI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Chance a Flee attempt succeeds
    pub flee_chance: f64,
    /// Chance a calm boss uses its special when off cooldown
    pub special_attack_chance: f64,
    /// Chance an enraged boss strikes a second time
    pub enraged_double_strike_chance: f64,
    /// Chance an opponent attacks rather than defends
    pub opponent_attack_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            flee_chance: FLEE_CHANCE,
            special_attack_chance: SPECIAL_ATTACK_CHANCE,
            enraged_double_strike_chance: ENRAGED_DOUBLE_STRIKE_CHANCE,
            opponent_attack_chance: OPPONENT_ATTACK_CHANCE,
        }
    }
}

impl Tuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let knobs = [
            ("flee_chance", self.flee_chance),
            ("special_attack_chance", self.special_attack_chance),
            ("enraged_double_strike_chance", self.enraged_double_strike_chance),
            ("opponent_attack_chance", self.opponent_attack_chance),
        ];
        for (name, value) in knobs {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        Ok(())
    }
}

fn default_crit_chance() -> f64 {
    DEFAULT_CRIT_CHANCE
}

fn default_crit_multiplier() -> f64 {
    DEFAULT_CRIT_MULTIPLIER
}

/// Weapon template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub name: String,
    pub base_damage: i32,
    #[serde(default = "default_crit_chance")]
    pub critical_chance: f64,
    #[serde(default = "default_crit_multiplier")]
    pub critical_multiplier: f64,
}

impl WeaponDef {
    pub fn new(name: impl Into<String>, base_damage: i32) -> Self {
        Self {
            name: name.into(),
            base_damage,
            critical_chance: DEFAULT_CRIT_CHANCE,
            critical_multiplier: DEFAULT_CRIT_MULTIPLIER,
        }
    }

    pub fn with_critical(mut self, chance: f64, multiplier: f64) -> Self {
        self.critical_chance = chance;
        self.critical_multiplier = multiplier;
        self
    }

    pub(crate) fn validate(&self, owner: &str) -> Result<(), ConfigError> {
        if self.base_damage < 0 {
            return Err(ConfigError::NegativeDamage {
                owner: owner.to_string(),
                weapon: self.name.clone(),
                damage: self.base_damage,
            });
        }
        let multiplier_ok = self.critical_multiplier >= 1.0;
        if !(0.0..=1.0).contains(&self.critical_chance) || !multiplier_ok {
            return Err(ConfigError::InvalidCritical {
                weapon: self.name.clone(),
                chance: self.critical_chance,
                multiplier: self.critical_multiplier,
            });
        }
        Ok(())
    }

    pub fn to_weapon(&self) -> Weapon {
        Weapon::with_critical(
            self.name.clone(),
            self.base_damage,
            self.critical_chance,
            self.critical_multiplier,
        )
    }
}

/// Player template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDef {
    pub name: String,
    pub max_health: i32,
    pub weapon: WeaponDef,
}

impl Default for PlayerDef {
    fn default() -> Self {
        Self {
            name: "Hero".to_string(),
            max_health: 50,
            weapon: WeaponDef::new("Iron Sword", 6).with_critical(0.15, 2.0),
        }
    }
}

impl PlayerDef {
    /// Use `name` unless it is blank
    pub fn named(mut self, name: &str) -> Self {
        let trimmed = name.trim();
        if !trimmed.is_empty() {
            self.name = trimmed.to_string();
        }
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyPlayerName);
        }
        if self.max_health <= 0 {
            return Err(ConfigError::NonPositiveHealth {
                name: self.name.clone(),
                max_health: self.max_health,
            });
        }
        self.weapon.validate(&self.name)
    }

    pub fn to_combatant(&self, status_effects: bool) -> Combatant {
        let player = Combatant::new(self.name.clone(), self.max_health, self.weapon.to_weapon());
        if status_effects {
            player.with_status_effects()
        } else {
            player
        }
    }
}

/// Full session setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub player: PlayerDef,
    pub encounters: Vec<EncounterDef>,
    #[serde(default)]
    pub tuning: Tuning,
    /// Let boss specials burn and stun the player
    #[serde(default)]
    pub player_status_effects: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            player: PlayerDef::default(),
            encounters: default_campaign(),
            tuning: Tuning::default(),
            player_status_effects: false,
        }
    }
}

impl SessionConfig {
    /// Check every template; the first problem found is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.player.validate()?;
        self.tuning.validate()?;
        if self.encounters.is_empty() {
            return Err(ConfigError::NoEncounters);
        }
        for (index, def) in self.encounters.iter().enumerate() {
            def.validate(index)?;
        }
        Ok(())
    }
}
