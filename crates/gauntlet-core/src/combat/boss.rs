//! Boss mechanics
//!
//! A boss is an ordinary [`Combatant`] carrying a [`BossExtension`]. The
//! extension changes three things:
//!
//! - incoming damage is halved until the boss enrages,
//! - attacks may be replaced by a cooldown-gated special attack,
//! - once enraged, every attack has a chance of a follow-up strike.
//!
//! Enrage triggers at the start of the boss's turn once health drops to half
//! and never reverts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::combatant::{AttackOutcome, Combatant};
use super::status::{StatusEffectTarget, StatusKind};
use super::weapon::Weapon;
use crate::config::Tuning;
use crate::consts::{
    BOSS_DAMAGE_SCALE, BOSS_DEFENSE_BONUS, BURN_DIVISOR, BURN_TURNS, ENRAGE_DAMAGE_SCALE,
    ENRAGE_DEFENSE_BONUS, ENRAGED_DOUBLE_STRIKE_CHANCE, SPECIAL_ATTACK_CHANCE,
    SPECIAL_COOLDOWN_MAX, SPECIAL_COOLDOWN_MIN, SPECIAL_CRIT_FACTOR, SPECIAL_MULTIPLIER_MAX,
    SPECIAL_MULTIPLIER_MIN, STUN_TURNS,
};
use crate::rng::RandomSource;

/// Boss-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossExtension {
    pub special_attack_name: String,
    pub special_attack_cooldown: u32,
    pub turn_count: u32,
    pub enraged: bool,
    /// Chance a calm boss uses its special when off cooldown
    pub special_attack_chance: f64,
    /// Chance an enraged boss strikes a second time
    pub double_strike_chance: f64,
}

impl Combatant {
    /// Create a boss. Bosses start with +3 defense and 1.5x weapon damage.
    pub fn new_boss(
        name: impl Into<String>,
        max_health: i32,
        mut weapon: Weapon,
        special_attack_name: impl Into<String>,
    ) -> Self {
        weapon.scale_damage(BOSS_DAMAGE_SCALE);
        let mut boss = Combatant::new(name, max_health, weapon);
        boss.defense = boss.defense.saturating_add(BOSS_DEFENSE_BONUS);
        boss.boss = Some(BossExtension {
            special_attack_name: special_attack_name.into(),
            special_attack_cooldown: 0,
            turn_count: 0,
            enraged: false,
            special_attack_chance: SPECIAL_ATTACK_CHANCE,
            double_strike_chance: ENRAGED_DOUBLE_STRIKE_CHANCE,
        });
        boss
    }

    /// Take the boss AI probabilities from `tuning` (no-op on non-bosses)
    pub fn with_boss_tuning(mut self, tuning: Tuning) -> Self {
        if let Some(ext) = self.boss.as_mut() {
            ext.special_attack_chance = tuning.special_attack_chance;
            ext.double_strike_chance = tuning.enraged_double_strike_chance;
        }
        self
    }

    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    pub fn boss(&self) -> Option<&BossExtension> {
        self.boss.as_ref()
    }

    pub fn is_enraged(&self) -> bool {
        self.boss.as_ref().is_some_and(|ext| ext.enraged)
    }

    /// Start-of-turn bookkeeping for a boss.
    ///
    /// Returns true if the boss enraged this turn. Does nothing for
    /// non-bosses.
    pub fn start_turn(&mut self) -> bool {
        let half_health = self.max_health() / 2;
        let health = self.health();
        let Some(ext) = self.boss.as_mut() else {
            return false;
        };

        ext.turn_count = ext.turn_count.saturating_add(1);
        if ext.special_attack_cooldown > 0 {
            ext.special_attack_cooldown -= 1;
        }

        if !ext.enraged && health <= half_health {
            return self.enrage();
        }
        false
    }

    /// Enter the enraged state. Idempotent; returns true only on the
    /// transition.
    pub fn enrage(&mut self) -> bool {
        match self.boss.as_mut() {
            Some(ext) if !ext.enraged => ext.enraged = true,
            _ => return false,
        }

        self.weapon.scale_damage(ENRAGE_DAMAGE_SCALE);
        self.defense = self.defense.saturating_add(ENRAGE_DEFENSE_BONUS);
        let healed = self.heal(self.max_health() / 4);
        debug!(boss = %self.name, healed, "boss enraged");
        true
    }

    pub(crate) fn boss_attack(
        &mut self,
        target: &mut Combatant,
        rng: &mut dyn RandomSource,
    ) -> AttackOutcome {
        if !self.is_alive() {
            return AttackOutcome::NONE;
        }
        let Some(ext) = self.boss.as_ref() else {
            return self.base_attack(target, rng);
        };

        let enraged = ext.enraged;
        let double_strike_chance = ext.double_strike_chance;
        let use_special = ext.special_attack_cooldown == 0
            && (enraged || rng.chance(ext.special_attack_chance));

        let mut outcome = if use_special {
            self.special_attack(target, rng)
        } else {
            self.base_attack(target, rng)
        };

        // No follow-up once the target is down
        if enraged && target.is_alive() && rng.chance(double_strike_chance) {
            let follow_up = self.base_attack(target, rng);
            outcome.damage = outcome.damage.saturating_add(follow_up.damage);
            outcome.critical |= follow_up.critical;
            outcome.bonus_consumed = outcome
                .bonus_consumed
                .saturating_add(follow_up.bonus_consumed);
            outcome.extra_strike = true;
        }

        outcome
    }

    /// Unleash the boss's special attack.
    ///
    /// Deals 1.5x-2.5x weapon damage with double the normal critical chance
    /// (uncapped: a doubled chance above 1.0 always crits), then puts the
    /// special on a 2-4 turn cooldown. Specials named after fire burn the
    /// target and those named after freezing stun it, provided the target can
    /// carry status effects.
    pub fn special_attack(
        &mut self,
        target: &mut Combatant,
        rng: &mut dyn RandomSource,
    ) -> AttackOutcome {
        if !self.is_alive() {
            return AttackOutcome::NONE;
        }
        let Some(ext) = self.boss.as_mut() else {
            return AttackOutcome::NONE;
        };

        ext.special_attack_cooldown = rng.range_inclusive(SPECIAL_COOLDOWN_MIN, SPECIAL_COOLDOWN_MAX);
        let name = ext.special_attack_name.clone();

        let multiplier = rng.uniform(SPECIAL_MULTIPLIER_MIN, SPECIAL_MULTIPLIER_MAX);
        let mut damage = (self.weapon.base_damage() as f64 * multiplier) as i32;

        let critical = rng.chance(self.weapon.critical_chance() * SPECIAL_CRIT_FACTOR);
        if critical {
            damage = (damage as f64 * self.weapon.critical_multiplier()) as i32;
        }
        self.weapon.set_last_hit_critical(critical);

        let dealt = target.take_damage(damage);

        let lowered = name.to_lowercase();
        let inflicted = match target.status_target_mut() {
            Some(effects) if lowered.contains("fire") => {
                effects.apply_burn(damage / BURN_DIVISOR, BURN_TURNS);
                (damage / BURN_DIVISOR > 0).then_some(StatusKind::Burn)
            }
            Some(effects) if lowered.contains("freeze") => {
                effects.apply_stun(STUN_TURNS);
                Some(StatusKind::Stun)
            }
            _ => None,
        };

        debug!(boss = %self.name, special = %name, damage, dealt, critical, "special attack");

        AttackOutcome {
            damage: dealt,
            critical,
            special: Some(name),
            inflicted,
            ..AttackOutcome::NONE
        }
    }
}
