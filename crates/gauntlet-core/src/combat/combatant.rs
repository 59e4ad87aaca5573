//! Combatants: the player and every opponent
//!
//! Health is private and only changes through [`Combatant::set_health`], which
//! keeps it inside `0..=max_health`. Acting while dead is not an error: every
//! operation on a dead combatant is a no-op that reports zero.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::boss::BossExtension;
use super::status::{StatusEffectTarget, StatusEffects, StatusKind, StatusTick};
use super::weapon::Weapon;
use crate::consts::{
    ATTACK_ITEM_BONUS, BASE_DEFENSE, DEFEND_BONUS, HEALTH_ITEM_HEAL, LEVEL_UP_DEFENSE,
    LEVEL_UP_MAX_HEALTH, XP_PER_LEVEL,
};
use crate::rng::RandomSource;

/// Result of one attack action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttackOutcome {
    /// Damage actually dealt after the target's defenses
    pub damage: i32,
    /// At least one strike was a critical hit
    pub critical: bool,
    /// Strength-potion bonus spent on this attack
    pub bonus_consumed: i32,
    /// Name of the special attack used, if any
    pub special: Option<String>,
    /// An enraged boss struck a second time
    pub extra_strike: bool,
    /// Status effect left on the target
    pub inflicted: Option<StatusKind>,
}

impl AttackOutcome {
    /// Outcome of an attack that never happened (dead attacker)
    pub const NONE: Self = Self {
        damage: 0,
        critical: false,
        bonus_consumed: 0,
        special: None,
        extra_strike: false,
        inflicted: None,
    };
}

/// Anyone taking part in a fight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    max_health: i32,
    health: i32,
    pub weapon: Weapon,
    pub defense: i32,
    level: u32,
    experience: u32,

    // Per-hit and per-encounter state
    is_defending: bool,
    defense_bonus: i32,
    attack_bonus: i32,
    health_item_used: bool,
    attack_item_used: bool,

    /// Present only on combatants that can be burned or stunned
    status: Option<StatusEffects>,
    /// Present only on bosses
    pub(crate) boss: Option<BossExtension>,
}

impl Combatant {
    /// Create a level-1 combatant at full health.
    ///
    /// `max_health` below 1 is raised to 1.
    pub fn new(name: impl Into<String>, max_health: i32, weapon: Weapon) -> Self {
        let max_health = max_health.max(1);
        Self {
            name: name.into(),
            max_health,
            health: max_health,
            weapon,
            defense: BASE_DEFENSE,
            level: 1,
            experience: 0,
            is_defending: false,
            defense_bonus: 0,
            attack_bonus: 0,
            health_item_used: false,
            attack_item_used: false,
            status: None,
            boss: None,
        }
    }

    /// Give this combatant the ability to suffer burns and stuns
    pub fn with_status_effects(mut self) -> Self {
        self.status = Some(StatusEffects::new());
        self
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Set health, clamped to `0..=max_health`
    pub fn set_health(&mut self, value: i32) {
        self.health = value.clamp(0, self.max_health);
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u32 {
        self.experience
    }

    pub fn is_defending(&self) -> bool {
        self.is_defending
    }

    pub fn defense_bonus(&self) -> i32 {
        self.defense_bonus
    }

    pub fn attack_bonus(&self) -> i32 {
        self.attack_bonus
    }

    pub fn health_item_used(&self) -> bool {
        self.health_item_used
    }

    pub fn attack_item_used(&self) -> bool {
        self.attack_item_used
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Attack `target` with the equipped weapon.
    ///
    /// Bosses may swap in their special attack or strike twice; see
    /// [`BossExtension`].
    pub fn attack(&mut self, target: &mut Combatant, rng: &mut dyn RandomSource) -> AttackOutcome {
        if self.boss.is_some() {
            return self.boss_attack(target, rng);
        }
        self.base_attack(target, rng)
    }

    /// Plain weapon attack, shared by every combatant
    pub(crate) fn base_attack(
        &mut self,
        target: &mut Combatant,
        rng: &mut dyn RandomSource,
    ) -> AttackOutcome {
        if !self.is_alive() {
            return AttackOutcome::NONE;
        }

        let bonus = self.attack_bonus;
        let raw = self.weapon.roll_damage(rng).saturating_add(bonus);

        // One-shot buff
        if bonus > 0 {
            self.attack_bonus = 0;
            self.attack_item_used = true;
        }

        AttackOutcome {
            damage: target.take_damage(raw),
            critical: self.weapon.last_hit_was_critical(),
            bonus_consumed: bonus.max(0),
            ..AttackOutcome::NONE
        }
    }

    /// Take a hit of `amount` raw damage and return the damage actually taken.
    ///
    /// Non-enraged bosses halve the raw amount first.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let amount = match &self.boss {
            Some(boss) if !boss.enraged => (amount / 2).max(1),
            _ => amount,
        };
        self.absorb_hit(amount)
    }

    /// Defense and health bookkeeping for one incoming hit
    fn absorb_hit(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }

        let total_defense = self.defense.saturating_add(self.defense_bonus);
        let effective_defense = if self.is_defending {
            total_defense.saturating_mul(2)
        } else {
            total_defense
        };

        // Nobody is immune
        let taken = amount.saturating_sub(effective_defense).max(1);
        self.set_health(self.health.saturating_sub(taken));

        if self.is_defending {
            self.is_defending = false;
            self.defense_bonus = 0;
        }

        taken
    }

    /// Brace for the next incoming hit
    pub fn defend(&mut self) {
        self.is_defending = true;
        self.defense_bonus = DEFEND_BONUS;
    }

    /// Drink the health potion; returns health restored (0 if already used)
    pub fn use_health_item(&mut self) -> i32 {
        if self.health_item_used {
            return 0;
        }
        let before = self.health;
        self.set_health(self.health.saturating_add(HEALTH_ITEM_HEAL));
        self.health_item_used = true;
        self.health - before
    }

    /// Drink the strength potion; returns the bonus granted (0 if already used)
    pub fn use_attack_item(&mut self) -> i32 {
        if self.attack_item_used {
            return 0;
        }
        self.attack_bonus = ATTACK_ITEM_BONUS;
        self.attack_item_used = true;
        self.attack_bonus
    }

    /// Make both potions available again (new opponent)
    pub fn reset_item_usage(&mut self) {
        self.health_item_used = false;
        self.attack_item_used = false;
        self.defense_bonus = 0;
    }

    /// Heal by `amount`; returns health actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        if !self.is_alive() {
            return 0;
        }
        let before = self.health;
        self.set_health(self.health.saturating_add(amount));
        self.health - before
    }

    pub fn level_up(&mut self) {
        self.level = self.level.saturating_add(1);
        self.max_health = self.max_health.saturating_add(LEVEL_UP_MAX_HEALTH);
        self.health = self.max_health;
        self.defense = self.defense.saturating_add(LEVEL_UP_DEFENSE);
        self.weapon.upgrade_default();
    }

    /// Add experience and level up as many times as it pays for.
    ///
    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);

        let mut gained = 0;
        while self.experience >= self.xp_to_next_level() {
            self.experience -= self.xp_to_next_level();
            self.level_up();
            gained += 1;
        }
        gained
    }

    /// Experience needed to leave the current level
    pub fn xp_to_next_level(&self) -> u32 {
        self.level.saturating_mul(XP_PER_LEVEL)
    }

    /// Status effects, for combatants that can carry them
    pub fn status(&self) -> Option<&StatusEffects> {
        self.status.as_ref()
    }

    /// Capability query used by special attacks
    pub fn status_target_mut(&mut self) -> Option<&mut dyn StatusEffectTarget> {
        self.status
            .as_mut()
            .map(|effects| effects as &mut dyn StatusEffectTarget)
    }

    pub fn is_stunned(&self) -> bool {
        self.status.as_ref().is_some_and(StatusEffects::is_stunned)
    }

    /// Advance status effects at the start of this combatant's turn.
    ///
    /// Burn damage bypasses defense.
    pub fn tick_status(&mut self) -> StatusTick {
        if !self.is_alive() {
            return StatusTick::default();
        }
        let Some(effects) = self.status.as_mut() else {
            return StatusTick::default();
        };
        let tick = effects.tick();
        if tick.burn_damage > 0 {
            self.set_health(self.health.saturating_sub(tick.burn_damage));
        }
        tick
    }

    pub fn clear_status(&mut self) {
        if let Some(effects) = self.status.as_mut() {
            effects.clear();
        }
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Lvl {}) - HP: {}/{} | Weapon: {}",
            self.name, self.level, self.health, self.max_health, self.weapon
        )?;
        if self.is_enraged() {
            write!(f, " ENRAGED")?;
        }
        Ok(())
    }
}
