//! Encounter definitions and the queue they are drawn from
//!
//! Definitions are plain templates. The session turns one into a live
//! [`Combatant`] only when the previous opponent falls.

use std::collections::VecDeque;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::Combatant;
use crate::config::{Tuning, WeaponDef};
use crate::consts::DEFAULT_SPECIAL_ATTACK;
use crate::error::ConfigError;

/// Template for one opponent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterDef {
    pub name: String,
    #[serde(alias = "health")]
    pub max_health: i32,
    pub weapon: WeaponDef,
    #[serde(default)]
    pub is_boss: bool,
    #[serde(default, alias = "special_attack")]
    pub special_attack_name: Option<String>,
}

impl EncounterDef {
    pub fn new(name: impl Into<String>, max_health: i32, weapon: WeaponDef) -> Self {
        Self {
            name: name.into(),
            max_health,
            weapon,
            is_boss: false,
            special_attack_name: None,
        }
    }

    pub fn boss(
        name: impl Into<String>,
        max_health: i32,
        weapon: WeaponDef,
        special_attack_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            max_health,
            weapon,
            is_boss: true,
            special_attack_name: Some(special_attack_name.into()),
        }
    }

    /// Parse a JSON array of definitions and validate each one
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, ConfigError> {
        let defs: Vec<Self> = serde_json::from_str(json)?;
        if defs.is_empty() {
            return Err(ConfigError::NoEncounters);
        }
        for (index, def) in defs.iter().enumerate() {
            def.validate(index)?;
        }
        Ok(defs)
    }

    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName { index });
        }
        if self.max_health <= 0 {
            return Err(ConfigError::NonPositiveHealth {
                name: self.name.clone(),
                max_health: self.max_health,
            });
        }
        self.weapon.validate(&self.name)
    }

    /// Build the live opponent. Bosses pick up boss stat adjustments here.
    pub fn into_combatant(self, tuning: Tuning) -> Combatant {
        let weapon = self.weapon.to_weapon();
        if self.is_boss {
            let special = self
                .special_attack_name
                .unwrap_or_else(|| DEFAULT_SPECIAL_ATTACK.to_string());
            Combatant::new_boss(self.name, self.max_health, weapon, special).with_boss_tuning(tuning)
        } else {
            Combatant::new(self.name, self.max_health, weapon)
        }
    }
}

/// Read and validate a JSON encounter file
pub fn load_encounters(path: &Path) -> Result<Vec<EncounterDef>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    EncounterDef::list_from_json(&contents)
}

/// The stock three-fight campaign: Goblin, Orc, then the Dragon
pub fn default_campaign() -> Vec<EncounterDef> {
    vec![
        EncounterDef::new("Goblin", 30, WeaponDef::new("Rusty Dagger", 5)),
        EncounterDef::new("Orc", 50, WeaponDef::new("Battle Axe", 8)),
        EncounterDef::boss(
            "Dragon",
            100,
            WeaponDef::new("Fire Breath", 12).with_critical(0.2, 2.0),
            "Inferno Breath",
        ),
    ]
}

/// Opponents still to be fought, first in first out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncounterQueue {
    pending: VecDeque<EncounterDef>,
}

impl EncounterQueue {
    pub fn new(defs: impl IntoIterator<Item = EncounterDef>) -> Self {
        Self {
            pending: defs.into_iter().collect(),
        }
    }

    /// Take the next definition off the front
    pub fn pop(&mut self) -> Option<EncounterDef> {
        self.pending.pop_front()
    }

    pub fn peek(&self) -> Option<&EncounterDef> {
        self.pending.front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
