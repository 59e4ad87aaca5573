//! Turn engine
//!
//! A [`Session`] owns the player, the current opponent and the queue of
//! opponents still to come. Each round is resolved by [`Session::play_round`]:
//! the player acts, then the opponent, with victory and defeat checked in
//! between. [`Session::run`] drives rounds from a [`DecisionSource`] until the
//! session is over.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, info, warn};

use crate::combat::{AttackOutcome, Combatant, StatusKind, StatusTick};
use crate::config::{SessionConfig, Tuning};
use crate::consts::XP_PER_TURN;
use crate::encounter::EncounterQueue;
use crate::error::{ConfigError, RejectedAction};
use crate::event::{EventSink, GameEvent};
use crate::rng::{GameRng, RandomSource};

/// What the player can do on their turn
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PlayerAction {
    Attack,
    Defend,
    #[strum(to_string = "Use Health Potion")]
    UseHealthItem,
    #[strum(to_string = "Use Strength Potion")]
    UseAttackItem,
    #[strum(to_string = "Run Away")]
    Flee,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Outcome {
    /// Every opponent was defeated
    Victory,
    /// The player died
    Defeat,
    /// The player ran away
    Fled,
    /// The decision source stopped answering
    Abandoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    InCombat,
    GameOver(Outcome),
}

/// Result of one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundResult {
    /// The fight goes on against the same opponent
    Continue,
    /// The opponent fell and the next one has appeared
    OpponentDefeated {
        name: String,
        experience: u32,
        levels_gained: u32,
    },
    /// Nothing more can happen
    GameOver(Outcome),
}

/// Read-only snapshot handed to a [`DecisionSource`]
#[derive(Debug, Clone, Copy)]
pub struct TurnView<'a> {
    /// Number of the turn about to be played
    pub turn: u32,
    pub player: &'a Combatant,
    pub opponent: &'a Combatant,
    pub health_item_available: bool,
    pub attack_item_available: bool,
    /// The player will lose this turn whatever they choose
    pub stunned: bool,
    /// Opponents still waiting after the current one
    pub remaining_encounters: usize,
}

impl fmt::Display for TurnView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.player)?;
        write!(f, "{}", self.opponent)
    }
}

/// Supplier of player decisions
pub trait DecisionSource {
    /// Pick the next action. `None` means no more input; the session ends as
    /// [`Outcome::Abandoned`].
    fn decide(&mut self, view: &TurnView<'_>) -> Option<PlayerAction>;

    /// Called when the session refused the last decision
    fn rejected(&mut self, _reason: &RejectedAction) {}
}

/// One play-through of an encounter sequence
pub struct Session<R = GameRng> {
    player: Combatant,
    opponent: Option<Combatant>,
    queue: EncounterQueue,
    tuning: Tuning,
    turn_count: u32,
    phase: Phase,
    rng: R,
}

impl<R: RandomSource> Session<R> {
    /// Validate `config` and build the player. No opponent is loaded until
    /// [`start`](Self::start).
    pub fn new(config: SessionConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let player = config.player.to_combatant(config.player_status_effects);
        Ok(Self {
            player,
            opponent: None,
            queue: EncounterQueue::new(config.encounters),
            tuning: config.tuning,
            turn_count: 0,
            phase: Phase::Setup,
            rng,
        })
    }

    pub fn player(&self) -> &Combatant {
        &self.player
    }

    pub fn opponent(&self) -> Option<&Combatant> {
        self.opponent.as_ref()
    }

    /// Rounds played against the current opponent
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::GameOver(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Opponents not yet fought, excluding the current one
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Snapshot for the decision source, available while in combat
    pub fn view(&self) -> Option<TurnView<'_>> {
        if self.phase != Phase::InCombat {
            return None;
        }
        let opponent = self.opponent.as_ref()?;
        Some(TurnView {
            turn: self.turn_count + 1,
            player: &self.player,
            opponent,
            health_item_available: !self.player.health_item_used(),
            attack_item_available: !self.player.attack_item_used(),
            stunned: self.player.is_stunned(),
            remaining_encounters: self.queue.len(),
        })
    }

    /// Load the first opponent. Does nothing once the session has started.
    pub fn start(&mut self, sink: &mut dyn EventSink) {
        if self.phase != Phase::Setup {
            return;
        }
        info!(player = %self.player.name, encounters = self.queue.len(), "session started");
        if !self.next_opponent(sink) {
            // Only reachable with an empty queue, which validation rejects
            self.finish(Outcome::Victory);
        }
    }

    /// Resolve one full round: the player's action, then the opponent's.
    ///
    /// Fleeing from a boss is refused without consuming the turn; so is any
    /// action outside of combat.
    pub fn play_round(
        &mut self,
        action: PlayerAction,
        sink: &mut dyn EventSink,
    ) -> Result<RoundResult, RejectedAction> {
        match self.phase {
            Phase::Setup => return Err(RejectedAction::NotStarted),
            Phase::GameOver(_) => return Err(RejectedAction::SessionOver),
            Phase::InCombat => {}
        }
        let Some(opponent) = self.opponent.as_mut() else {
            return Err(RejectedAction::NotStarted);
        };

        if action == PlayerAction::Flee && opponent.is_boss() {
            warn!(boss = %opponent.name, "flee from boss refused");
            return Err(RejectedAction::CannotFleeBoss);
        }

        self.turn_count = self.turn_count.saturating_add(1);
        debug!(turn = self.turn_count, %action, "round start");

        // Player sub-turn
        let player = &mut self.player;
        let tick = player.tick_status();
        report_tick(player, &tick, sink);
        if !player.is_alive() {
            sink.emit(GameEvent::narrative(format!(
                "{} has been defeated!",
                player.name
            )));
            return Ok(self.finish(Outcome::Defeat));
        }

        if tick.stunned {
            debug!(%action, "player stunned, action discarded");
        } else {
            match action {
                PlayerAction::Attack => {
                    let outcome = player.attack(opponent, &mut self.rng);
                    report_attack(player, opponent, &outcome, sink);
                    if outcome.bonus_consumed > 0 {
                        sink.emit(GameEvent::narrative(format!(
                            "{}'s attack is empowered! (+{} damage)",
                            player.name, outcome.bonus_consumed
                        )));
                    }
                }
                PlayerAction::Defend => {
                    player.defend();
                    sink.emit(GameEvent::narrative(format!(
                        "{} prepares to defend! (+{} defense)",
                        player.name,
                        player.defense_bonus()
                    )));
                }
                PlayerAction::UseHealthItem => {
                    if player.health_item_used() {
                        sink.emit(GameEvent::narrative(
                            "You've already used your health potion for this battle!",
                        ));
                    } else {
                        let amount = player.use_health_item();
                        sink.emit(GameEvent::Heal {
                            healer: player.name.clone(),
                            amount,
                            target: None,
                        });
                    }
                }
                PlayerAction::UseAttackItem => {
                    let bonus = player.use_attack_item();
                    let text = if bonus > 0 {
                        format!(
                            "{} drinks a strength potion! Next attack will deal +{bonus} damage!",
                            player.name
                        )
                    } else {
                        "You've already used your strength potion for this battle!".to_string()
                    };
                    sink.emit(GameEvent::Narrative(text));
                }
                PlayerAction::Flee => {
                    if self.rng.chance(self.tuning.flee_chance) {
                        sink.emit(GameEvent::narrative("You successfully ran away!"));
                        return Ok(self.finish(Outcome::Fled));
                    }
                    sink.emit(GameEvent::narrative("You failed to escape!"));
                }
            }
        }

        if !opponent.is_alive() {
            return Ok(self.victory_check(sink));
        }

        // Opponent sub-turn
        if opponent.start_turn() {
            sink.emit(GameEvent::narrative(format!(
                "{} becomes ENRAGED!",
                opponent.name
            )));
        }
        if self.rng.chance(self.tuning.opponent_attack_chance) {
            let outcome = opponent.attack(player, &mut self.rng);
            report_attack(opponent, player, &outcome, sink);
        } else {
            opponent.defend();
            sink.emit(GameEvent::narrative(format!(
                "{} prepares to defend!",
                opponent.name
            )));
        }

        if !player.is_alive() {
            return Ok(self.finish(Outcome::Defeat));
        }
        if !opponent.is_alive() {
            return Ok(self.victory_check(sink));
        }
        Ok(RoundResult::Continue)
    }

    /// Play rounds until the session is over, asking `source` for every
    /// decision and again after every refusal.
    pub fn run(&mut self, source: &mut dyn DecisionSource, sink: &mut dyn EventSink) -> Outcome {
        self.start(sink);
        loop {
            if let Phase::GameOver(outcome) = self.phase {
                return outcome;
            }
            let decision = match self.view() {
                Some(view) => source.decide(&view),
                None => None,
            };
            let Some(action) = decision else {
                info!("decision source closed");
                return self.abandon();
            };
            if let Err(reason) = self.play_round(action, sink) {
                source.rejected(&reason);
            }
        }
    }

    /// End the session early. Has no effect on a finished session.
    pub fn abandon(&mut self) -> Outcome {
        match self.phase {
            Phase::GameOver(outcome) => outcome,
            _ => {
                self.finish(Outcome::Abandoned);
                Outcome::Abandoned
            }
        }
    }

    /// The opponent is down: pay out experience and bring in the next one
    fn victory_check(&mut self, sink: &mut dyn EventSink) -> RoundResult {
        let Some(defeated) = self.opponent.as_ref().map(|o| o.name.clone()) else {
            return RoundResult::Continue;
        };
        sink.emit(GameEvent::narrative(format!("You defeated {defeated}!")));

        let experience = XP_PER_TURN.saturating_mul(self.turn_count);
        let levels_gained = self.player.gain_experience(experience);
        sink.emit(GameEvent::narrative(format!(
            "{} gains {experience} experience!",
            self.player.name
        )));
        let level = self.player.level();
        for back in (0..levels_gained).rev() {
            let reached = level.saturating_sub(back);
            sink.emit(GameEvent::narrative(format!(
                "{} leveled up to level {reached}!",
                self.player.name
            )));
        }
        info!(%defeated, experience, levels_gained, "opponent defeated");

        self.player.reset_item_usage();

        if self.next_opponent(sink) {
            RoundResult::OpponentDefeated {
                name: defeated,
                experience,
                levels_gained,
            }
        } else {
            sink.emit(GameEvent::narrative(
                "Congratulations! You've defeated all enemies!",
            ));
            self.finish(Outcome::Victory)
        }
    }

    /// Pull the next definition off the queue. Returns false when it is empty.
    fn next_opponent(&mut self, sink: &mut dyn EventSink) -> bool {
        let Some(def) = self.queue.pop() else {
            return false;
        };
        let opponent = def.into_combatant(self.tuning);
        info!(opponent = %opponent.name, boss = opponent.is_boss(), "encounter begins");
        sink.emit(GameEvent::narrative(format!(
            "A wild {} appears!",
            opponent.name
        )));

        self.opponent = Some(opponent);
        self.turn_count = 0;
        self.player.clear_status();
        self.phase = Phase::InCombat;
        true
    }

    fn finish(&mut self, outcome: Outcome) -> RoundResult {
        info!(%outcome, level = self.player.level(), "session over");
        self.phase = Phase::GameOver(outcome);
        RoundResult::GameOver(outcome)
    }
}

/// Events for one resolved attack: the hit itself, then its consequences
fn report_attack(
    attacker: &Combatant,
    defender: &Combatant,
    outcome: &AttackOutcome,
    sink: &mut dyn EventSink,
) {
    if let Some(special) = &outcome.special {
        sink.emit(GameEvent::narrative(format!(
            "{} unleashes {special}!",
            attacker.name
        )));
    }
    sink.emit(GameEvent::Combat {
        attacker: attacker.name.clone(),
        defender: defender.name.clone(),
        damage: outcome.damage,
        critical: outcome.critical,
    });
    if outcome.critical {
        sink.emit(GameEvent::narrative(format!(
            "CRITICAL HIT! {}'s attack was devastating!",
            attacker.name
        )));
    }
    if outcome.damage == 0 {
        sink.emit(GameEvent::narrative(format!(
            "{} blocked the attack!",
            defender.name
        )));
    }
    if outcome.extra_strike {
        sink.emit(GameEvent::narrative(format!(
            "{} strikes again in a frenzy!",
            attacker.name
        )));
    }
    if let Some(effect) = outcome.inflicted {
        sink.emit(GameEvent::Status {
            character: defender.name.clone(),
            effect,
            applied: true,
        });
    }
    if !defender.is_alive() {
        sink.emit(GameEvent::narrative(format!(
            "{} has been defeated!",
            defender.name
        )));
    }
}

fn report_tick(character: &Combatant, tick: &StatusTick, sink: &mut dyn EventSink) {
    if tick.burn_damage > 0 {
        sink.emit(GameEvent::narrative(format!(
            "{} takes {} burn damage!",
            character.name, tick.burn_damage
        )));
    }
    if tick.burn_expired {
        sink.emit(GameEvent::Status {
            character: character.name.clone(),
            effect: StatusKind::Burn,
            applied: false,
        });
    }
    if tick.stunned {
        sink.emit(GameEvent::narrative(format!(
            "{} is stunned and cannot act!",
            character.name
        )));
    }
    if tick.stun_expired {
        sink.emit(GameEvent::Status {
            character: character.name.clone(),
            effect: StatusKind::Stun,
            applied: false,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::combat::{StatusEffectTarget, Weapon};
    use crate::config::WeaponDef;
    use crate::encounter::{EncounterDef, default_campaign};
    use crate::rng::ScriptedRng;

    fn goblin(health: i32) -> EncounterDef {
        EncounterDef::new("Goblin", health, WeaponDef::new("Rusty Dagger", 5))
    }

    fn orc() -> EncounterDef {
        EncounterDef::new("Orc", 50, WeaponDef::new("Battle Axe", 8))
    }

    fn config(encounters: Vec<EncounterDef>) -> SessionConfig {
        SessionConfig {
            encounters,
            ..SessionConfig::default()
        }
    }

    fn started(config: SessionConfig, rng: ScriptedRng) -> (Session<ScriptedRng>, Vec<GameEvent>) {
        let mut session = Session::new(config, rng).unwrap();
        let mut events = Vec::new();
        session.start(&mut events);
        (session, events)
    }

    fn narrated(events: &[GameEvent], text: &str) -> bool {
        events
            .iter()
            .any(|e| matches!(e, GameEvent::Narrative(t) if t == text))
    }

    struct Scripted(VecDeque<PlayerAction>, Vec<RejectedAction>);

    impl DecisionSource for Scripted {
        fn decide(&mut self, _view: &TurnView<'_>) -> Option<PlayerAction> {
            self.0.pop_front()
        }

        fn rejected(&mut self, reason: &RejectedAction) {
            self.1.push(*reason);
        }
    }

    #[test]
    fn test_menu_order() {
        let labels: Vec<String> = PlayerAction::iter().map(|a| a.to_string()).collect();
        assert_eq!(
            labels,
            [
                "Attack",
                "Defend",
                "Use Health Potion",
                "Use Strength Potion",
                "Run Away"
            ]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Session::new(config(Vec::new()), ScriptedRng::default());
        assert!(matches!(result, Err(ConfigError::NoEncounters)));
    }

    #[test]
    fn test_start_loads_first_opponent() {
        let (session, events) = started(SessionConfig::default(), ScriptedRng::default());
        assert_eq!(session.phase(), Phase::InCombat);
        assert_eq!(session.opponent().unwrap().name, "Goblin");
        assert_eq!(session.pending(), 2);
        assert_eq!(session.turn_count(), 0);
        assert_eq!(events, vec![GameEvent::narrative("A wild Goblin appears!")]);
    }

    #[test]
    fn test_round_before_start_refused() {
        let mut session = Session::new(SessionConfig::default(), ScriptedRng::default()).unwrap();
        let mut events = Vec::new();
        assert_eq!(
            session.play_round(PlayerAction::Attack, &mut events),
            Err(RejectedAction::NotStarted)
        );
        assert!(session.view().is_none());
    }

    #[test]
    fn test_goblin_defeated_on_turn_three() {
        // Fallback draws never crit and the goblin always defends: 1 damage a round
        let (mut session, _) = started(config(vec![goblin(3), orc()]), ScriptedRng::default());
        let mut events = Vec::new();

        assert_eq!(
            session.play_round(PlayerAction::Attack, &mut events),
            Ok(RoundResult::Continue)
        );
        assert_eq!(
            session.play_round(PlayerAction::Attack, &mut events),
            Ok(RoundResult::Continue)
        );
        assert_eq!(session.turn_count(), 2);

        let result = session.play_round(PlayerAction::Attack, &mut events).unwrap();
        assert_eq!(
            result,
            RoundResult::OpponentDefeated {
                name: "Goblin".to_string(),
                experience: 150,
                levels_gained: 1,
            }
        );

        let orc = session.opponent().unwrap();
        assert_eq!(orc.name, "Orc");
        assert_eq!(orc.health(), 50);
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.player().level(), 2);
        assert_eq!(session.player().experience(), 50);
        assert!(narrated(&events, "You defeated Goblin!"));
        assert!(narrated(&events, "Hero leveled up to level 2!"));
        assert!(narrated(&events, "A wild Orc appears!"));
    }

    #[test]
    fn test_victory_after_last_opponent() {
        let (mut session, _) = started(config(vec![goblin(1)]), ScriptedRng::default());
        let mut events = Vec::new();
        let result = session.play_round(PlayerAction::Attack, &mut events);
        assert_eq!(result, Ok(RoundResult::GameOver(Outcome::Victory)));
        assert_eq!(session.outcome(), Some(Outcome::Victory));
        assert!(narrated(&events, "Congratulations! You've defeated all enemies!"));
        // Killed before it could act: one draw for the player's crit roll
        assert_eq!(session.rng().consumed(), 1);

        assert_eq!(
            session.play_round(PlayerAction::Attack, &mut events),
            Err(RejectedAction::SessionOver)
        );
    }

    #[test]
    fn test_attack_events_in_order() {
        // crit roll fails, goblin attacks (0.0), goblin crit fails
        let rng = ScriptedRng::new([0.9, 0.0, 0.9]);
        let (mut session, _) = started(config(vec![goblin(30)]), rng);
        let mut events = Vec::new();
        session.play_round(PlayerAction::Attack, &mut events).unwrap();

        assert_eq!(
            events,
            vec![
                GameEvent::Combat {
                    attacker: "Hero".into(),
                    defender: "Goblin".into(),
                    damage: 1,
                    critical: false,
                },
                GameEvent::Combat {
                    attacker: "Goblin".into(),
                    defender: "Hero".into(),
                    damage: 1,
                    critical: false,
                },
            ]
        );
    }

    #[test]
    fn test_player_crit_reported() {
        // crit roll hits; the goblin then defends on the fallback draw
        let (mut session, _) = started(config(vec![goblin(30)]), ScriptedRng::new([0.0]));
        let mut events = Vec::new();
        session.play_round(PlayerAction::Attack, &mut events).unwrap();

        // 6 * 2.0 - 5
        assert_eq!(
            events[..2],
            [
                GameEvent::Combat {
                    attacker: "Hero".into(),
                    defender: "Goblin".into(),
                    damage: 7,
                    critical: true,
                },
                GameEvent::narrative("CRITICAL HIT! Hero's attack was devastating!"),
            ]
        );
        assert_eq!(session.opponent().unwrap().health(), 23);
    }

    #[test]
    fn test_enraged_double_strike_reported() {
        let mut cfg = config(default_campaign()[2..].to_vec());
        cfg.player.max_health = 500;
        // attack, cooldown, multiplier 1.5, no crit, second strike, no crit
        let rng = ScriptedRng::new([0.0, 0.0, 0.0, 0.9, 0.0, 0.9]);
        let (mut session, _) = started(cfg, rng);
        if let Some(dragon) = session.opponent.as_mut() {
            dragon.set_health(40);
        }
        let mut events = Vec::new();
        session.play_round(PlayerAction::Defend, &mut events).unwrap();

        // 27 * 1.5 = 40 against a guard of 14, then 27 against 5
        assert!(events.contains(&GameEvent::Combat {
            attacker: "Dragon".into(),
            defender: "Hero".into(),
            damage: 48,
            critical: false,
        }));
        assert!(narrated(&events, "Dragon unleashes Inferno Breath!"));
        assert!(narrated(&events, "Dragon strikes again in a frenzy!"));
        assert_eq!(session.player().health(), 452);
        assert_eq!(session.rng().remaining(), 0);
    }

    #[test]
    fn test_fire_special_burn_reported() {
        let salamander = EncounterDef::boss(
            "Salamander",
            60,
            WeaponDef::new("Claws", 10),
            "Fire Spit",
        );
        let mut cfg = SessionConfig {
            player_status_effects: true,
            ..config(vec![salamander])
        };
        cfg.player.max_health = 500;
        // attack, special, cooldown, multiplier 1.5, no crit
        let rng = ScriptedRng::new([0.0, 0.0, 0.0, 0.0, 0.9]);
        let (mut session, _) = started(cfg, rng);
        let mut events = Vec::new();
        session.play_round(PlayerAction::Defend, &mut events).unwrap();

        // 15 * 1.5 = 22 against a guard of 14; burn is 22 / 4
        assert!(narrated(&events, "Salamander unleashes Fire Spit!"));
        assert!(events.contains(&GameEvent::Status {
            character: "Hero".into(),
            effect: StatusKind::Burn,
            applied: true,
        }));
        assert_eq!(session.player().health(), 492);
        let burn = session.player().status().unwrap().burn().unwrap();
        assert_eq!(burn.damage_per_turn, 5);
        assert_eq!(burn.turns_left, 3);
    }

    #[test]
    fn test_zero_damage_reported_as_blocked() {
        let attacker = Combatant::new("Goblin", 30, Weapon::new("Rusty Dagger", 5));
        let mut defender = Combatant::new("Hero", 50, Weapon::new("Iron Sword", 6));
        defender.set_health(0);
        let mut events = Vec::new();
        report_attack(&attacker, &defender, &AttackOutcome::NONE, &mut events);

        assert!(narrated(&events, "Hero blocked the attack!"));
        assert!(!narrated(&events, "CRITICAL HIT! Goblin's attack was devastating!"));
        assert_eq!(events.last(), Some(&GameEvent::narrative("Hero has been defeated!")));
    }

    #[test]
    fn test_huge_player_health_does_not_overflow() {
        let mut cfg = config(vec![goblin(30)]);
        cfg.player.max_health = i32::MAX;
        let (mut session, _) = started(cfg, ScriptedRng::default());
        let mut events = Vec::new();
        session.play_round(PlayerAction::UseHealthItem, &mut events).unwrap();
        assert!(matches!(
            events.first(),
            Some(GameEvent::Heal { amount: 0, .. })
        ));
        assert!(session.player().is_alive());
    }

    #[test]
    fn test_flee_success_ends_session() {
        let (mut session, _) = started(SessionConfig::default(), ScriptedRng::new([0.1]));
        let mut events = Vec::new();
        let result = session.play_round(PlayerAction::Flee, &mut events);
        assert_eq!(result, Ok(RoundResult::GameOver(Outcome::Fled)));
        assert_eq!(session.player().experience(), 0);
        assert!(narrated(&events, "You successfully ran away!"));
    }

    #[test]
    fn test_flee_failure_consumes_turn() {
        let (mut session, _) = started(SessionConfig::default(), ScriptedRng::new([0.9]));
        let mut events = Vec::new();
        let result = session.play_round(PlayerAction::Flee, &mut events);
        assert_eq!(result, Ok(RoundResult::Continue));
        assert_eq!(session.turn_count(), 1);
        assert!(narrated(&events, "You failed to escape!"));
        assert!(narrated(&events, "Goblin prepares to defend!"));
    }

    #[test]
    fn test_cannot_flee_boss() {
        let dragon_only = config(default_campaign()[2..].to_vec());
        let (mut session, _) = started(dragon_only, ScriptedRng::default());
        let before = session.opponent().cloned();
        let mut events = Vec::new();

        assert_eq!(
            session.play_round(PlayerAction::Flee, &mut events),
            Err(RejectedAction::CannotFleeBoss)
        );
        assert_eq!(session.turn_count(), 0);
        assert_eq!(session.rng().consumed(), 0);
        assert!(events.is_empty());
        assert_eq!(session.opponent().cloned(), before);
        assert_eq!(session.phase(), Phase::InCombat);
    }

    #[test]
    fn test_defeat() {
        let mut cfg = config(vec![goblin(30)]);
        cfg.player.max_health = 1;
        // goblin attacks, no crit
        let (mut session, _) = started(cfg, ScriptedRng::new([0.0, 0.9]));
        let mut events = Vec::new();
        let result = session.play_round(PlayerAction::Defend, &mut events);
        assert_eq!(result, Ok(RoundResult::GameOver(Outcome::Defeat)));
        assert!(!session.player().is_alive());
        assert!(narrated(&events, "Hero has been defeated!"));
    }

    #[test]
    fn test_health_item_already_used() {
        let (mut session, _) = started(SessionConfig::default(), ScriptedRng::default());
        let mut events = Vec::new();
        session.play_round(PlayerAction::UseHealthItem, &mut events).unwrap();
        assert!(matches!(
            events.first(),
            Some(GameEvent::Heal { amount: 0, .. })
        ));

        events.clear();
        session.play_round(PlayerAction::UseHealthItem, &mut events).unwrap();
        assert!(narrated(
            &events,
            "You've already used your health potion for this battle!"
        ));
        assert!(!session.view().unwrap().health_item_available);
    }

    #[test]
    fn test_strength_potion_empowers_next_attack() {
        let (mut session, _) = started(config(vec![goblin(30)]), ScriptedRng::default());
        let mut events = Vec::new();
        session.play_round(PlayerAction::UseAttackItem, &mut events).unwrap();
        assert!(narrated(
            &events,
            "Hero drinks a strength potion! Next attack will deal +5 damage!"
        ));

        events.clear();
        session.play_round(PlayerAction::Attack, &mut events).unwrap();
        assert!(narrated(&events, "Hero's attack is empowered! (+5 damage)"));
    }

    #[test]
    fn test_items_reset_for_next_opponent() {
        let (mut session, _) = started(config(vec![goblin(1), orc()]), ScriptedRng::default());
        let mut events = Vec::new();
        session.play_round(PlayerAction::UseAttackItem, &mut events).unwrap();
        session.play_round(PlayerAction::Attack, &mut events).unwrap();
        let view = session.view().unwrap();
        assert_eq!(view.opponent.name, "Orc");
        assert!(view.attack_item_available);
        assert!(view.health_item_available);
    }

    #[test]
    fn test_stunned_player_loses_turn() {
        let cfg = SessionConfig {
            player_status_effects: true,
            ..config(vec![goblin(30)])
        };
        let (mut session, _) = started(cfg, ScriptedRng::default());
        session.player.status_target_mut().unwrap().apply_stun(1);
        assert!(session.view().unwrap().stunned);

        let mut events = Vec::new();
        session.play_round(PlayerAction::Attack, &mut events).unwrap();
        assert_eq!(session.opponent().unwrap().health(), 30);
        assert!(narrated(&events, "Hero is stunned and cannot act!"));
        assert!(events.contains(&GameEvent::Status {
            character: "Hero".into(),
            effect: StatusKind::Stun,
            applied: false,
        }));
        assert!(!session.player().is_stunned());
    }

    #[test]
    fn test_burn_can_end_session() {
        let cfg = SessionConfig {
            player_status_effects: true,
            ..config(vec![goblin(30)])
        };
        let (mut session, _) = started(cfg, ScriptedRng::default());
        session.player.set_health(3);
        session.player.status_target_mut().unwrap().apply_burn(5, 3);

        let mut events = Vec::new();
        let result = session.play_round(PlayerAction::Attack, &mut events);
        assert_eq!(result, Ok(RoundResult::GameOver(Outcome::Defeat)));
        assert_eq!(session.opponent().unwrap().health(), 30);
        assert!(narrated(&events, "Hero takes 5 burn damage!"));
    }

    #[test]
    fn test_boss_enrage_announced() {
        // boss chooses to attack; every later draw falls back to 0.99
        let (mut session, _) = started(
            config(default_campaign()[2..].to_vec()),
            ScriptedRng::new([0.0]),
        );
        if let Some(dragon) = session.opponent.as_mut() {
            dragon.set_health(40);
        }
        let mut events = Vec::new();
        // Defend so the player's turn draws nothing; an enraged boss always specials
        session.play_round(PlayerAction::Defend, &mut events).unwrap();
        assert!(narrated(&events, "Dragon becomes ENRAGED!"));
        assert!(narrated(&events, "Dragon unleashes Inferno Breath!"));
        assert!(session.opponent().unwrap().is_enraged());
    }

    #[test]
    fn test_run_reprompts_after_rejection() {
        let mut session =
            Session::new(config(default_campaign()[2..].to_vec()), ScriptedRng::default()).unwrap();
        let mut source = Scripted(VecDeque::from([PlayerAction::Flee]), Vec::new());
        let mut events = Vec::new();

        let outcome = session.run(&mut source, &mut events);
        assert_eq!(outcome, Outcome::Abandoned);
        assert_eq!(source.1, vec![RejectedAction::CannotFleeBoss]);
        assert_eq!(session.phase(), Phase::GameOver(Outcome::Abandoned));
    }

    #[test]
    fn test_run_to_victory() {
        let mut session =
            Session::new(config(vec![goblin(1), goblin(1)]), ScriptedRng::default()).unwrap();
        let mut source = Scripted(
            VecDeque::from([PlayerAction::Attack, PlayerAction::Attack]),
            Vec::new(),
        );
        let mut events = Vec::new();
        assert_eq!(session.run(&mut source, &mut events), Outcome::Victory);
        assert!(source.0.is_empty());
        // 50 + 50 experience pays for exactly one level
        assert_eq!(session.player().experience(), 0);
        assert_eq!(session.player().level(), 2);
    }
}
