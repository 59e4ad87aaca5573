//! Core balance constants
//!
//! Probabilities here are only defaults; a session reads the live values from
//! [`Tuning`](crate::config::Tuning).

/// Defense every combatant starts with
pub const BASE_DEFENSE: i32 = 5;

/// Extra defense granted by the Defend action (for one hit)
pub const DEFEND_BONUS: i32 = 2;

/// Health restored by the health potion
pub const HEALTH_ITEM_HEAL: i32 = 20;

/// Damage added to the next attack by the strength potion
pub const ATTACK_ITEM_BONUS: i32 = 5;

/// Experience required per level (threshold is `level * XP_PER_LEVEL`)
pub const XP_PER_LEVEL: u32 = 100;

/// Experience awarded per turn spent defeating an opponent
pub const XP_PER_TURN: u32 = 50;

/// Level-up gains
pub const LEVEL_UP_MAX_HEALTH: i32 = 10;
pub const LEVEL_UP_DEFENSE: i32 = 1;
pub const WEAPON_UPGRADE_STEP: i32 = 1;

/// Weapon defaults when a definition leaves them out
pub const DEFAULT_CRIT_CHANCE: f64 = 0.1;
pub const DEFAULT_CRIT_MULTIPLIER: f64 = 2.0;

/// Boss stat adjustments
pub const BOSS_DEFENSE_BONUS: i32 = 3;
pub const BOSS_DAMAGE_SCALE: f64 = 1.5;
pub const ENRAGE_DAMAGE_SCALE: f64 = 1.5;
pub const ENRAGE_DEFENSE_BONUS: i32 = 2;

/// Special attack parameters
pub const SPECIAL_COOLDOWN_MIN: u32 = 2;
pub const SPECIAL_COOLDOWN_MAX: u32 = 4;
pub const SPECIAL_MULTIPLIER_MIN: f64 = 1.5;
pub const SPECIAL_MULTIPLIER_MAX: f64 = 2.5;
pub const SPECIAL_CRIT_FACTOR: f64 = 2.0;
pub const DEFAULT_SPECIAL_ATTACK: &str = "Special Attack";

/// Elemental follow-ups of special attacks
pub const BURN_DIVISOR: i32 = 4;
pub const BURN_TURNS: u32 = 3;
pub const STUN_TURNS: u32 = 1;

/// Default probabilities
pub const FLEE_CHANCE: f64 = 0.5;
pub const SPECIAL_ATTACK_CHANCE: f64 = 0.3;
pub const ENRAGED_DOUBLE_STRIKE_CHANCE: f64 = 0.5;
pub const OPPONENT_ATTACK_CHANCE: f64 = 0.7;
