/// GameState: the single authoritative aggregate of a session.
///
/// ## Ownership
///
/// The shell (`Session`) owns exactly one `GameState`. Level widgets never
/// hold a mutable reference to it: they read their own progress slice and
/// return verdicts, and the shell applies those through the transition
/// functions below.
///
/// ## Write discipline
///
/// A level's progress record is only written while `screen` shows that
/// level. Every transition checks this and returns
/// `TransitionError::InactiveLevel` otherwise. Such an error is a logic
/// defect in the caller, not a user-facing condition.
///
/// ## Lifecycle
///
/// Created once per session, replaced wholesale by `restart()`, dropped
/// with the process. Nothing is persisted.

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::content::{self, BattleSpec};
use crate::domain::level::{LevelId, LevelKind, Screen};
use crate::domain::rules::{self, CardOutcome};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("{expected:?} is not on screen (screen is {actual:?})")]
    InactiveLevel { expected: LevelId, actual: Screen },
    #[error("{0:?} is not complete yet")]
    Incomplete(LevelId),
    #[error("{0:?} is not a {1:?} level")]
    WrongKind(LevelId, LevelKind),
    #[error("{0:?} is already complete")]
    AlreadyComplete(LevelId),
    #[error("the campaign is already won")]
    Finished,
}

// ── Per-level progress records ──

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BiasProgress {
    pub found: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimelineProgress {
    pub placed: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizProgress {
    /// Also the index of the current question.
    pub answered: usize,
    pub correct: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleProgress {
    pub player_hp: u32,
    pub enemy_hp: u32,
    /// CDO conviction. Seeded from approval for the boss battle.
    pub meter: u32,
    /// Meter value a soft reset returns to.
    pub seed_meter: u32,
    pub round: u32,
}

impl BattleProgress {
    pub fn new(spec: &BattleSpec, seed_meter: u32) -> Self {
        BattleProgress {
            player_hp: spec.player_hp,
            enemy_hp: spec.enemy_hp,
            meter: seed_meter,
            seed_meter,
            round: 0,
        }
    }
}

/// What a single card play did, for the battle log and sound.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CardResult {
    pub outcome: CardOutcome,
    pub won: bool,
    pub player_down: bool,
}

/// Values the HUD shows. Derived, never stored.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Hud {
    pub score: u32,
    pub level: usize,
    pub total: usize,
    pub energy: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub screen: Screen,
    pub approval: u32,

    pub bias: BiasProgress,
    pub skirmish: BattleProgress,
    pub timeline: TimelineProgress,
    pub data_quiz: QuizProgress,
    pub framing_quiz: QuizProgress,
    pub boss: BattleProgress,

    // ── Side content ──
    pub energy: u32,
    pub coffee_found: bool,
    pub fax_triggered: bool,
}

impl GameState {
    pub fn new() -> Self {
        GameState {
            screen: Screen::Start,
            approval: rules::INITIAL_APPROVAL,
            bias: BiasProgress::default(),
            skirmish: BattleProgress::new(&content::SKIRMISH, 0),
            timeline: TimelineProgress::default(),
            data_quiz: QuizProgress::default(),
            framing_quiz: QuizProgress::default(),
            boss: BattleProgress::new(&content::BOSS, rules::INITIAL_APPROVAL),
            energy: rules::INITIAL_ENERGY,
            coffee_found: false,
            fax_triggered: false,
        }
    }

    /// Full reset: every record back to its initial value, screen to `Start`.
    pub fn restart(&mut self) {
        info!(from = ?self.screen, "restart");
        *self = GameState::new();
    }

    // ── Guards ──

    fn ensure_on(&self, level: LevelId) -> Result<(), TransitionError> {
        if self.screen == Screen::Level(level) {
            Ok(())
        } else {
            Err(TransitionError::InactiveLevel { expected: level, actual: self.screen })
        }
    }

    /// Records stop counting once their level's predicate holds.
    fn ensure_open(&self, level: LevelId) -> Result<(), TransitionError> {
        if self.level_complete(level) {
            Err(TransitionError::AlreadyComplete(level))
        } else {
            Ok(())
        }
    }

    fn ensure_kind(level: LevelId, kind: LevelKind) -> Result<(), TransitionError> {
        if level.kind() == kind {
            Ok(())
        } else {
            Err(TransitionError::WrongKind(level, kind))
        }
    }

    // ── Scoring ──

    /// Add `delta` to approval, clamped to the cap of the current screen.
    pub fn apply_correct_answer(&mut self, level: LevelId, delta: u32) -> Result<u32, TransitionError> {
        self.ensure_on(level)?;
        let cap = rules::approval_cap(Some(level));
        self.approval = rules::raise(self.approval, delta, cap);
        debug!(?level, delta, approval = self.approval, "approval up");
        Ok(self.approval)
    }

    /// Subtract `delta` from approval, floor 0. Also drains a little energy.
    pub fn apply_wrong_answer(&mut self, level: LevelId, delta: u32) -> Result<u32, TransitionError> {
        self.ensure_on(level)?;
        self.approval = rules::lower(self.approval, delta);
        self.energy = rules::lower(self.energy, rules::MISS_ENERGY_DRAIN);
        debug!(?level, delta, approval = self.approval, "approval down");
        Ok(self.approval)
    }

    // ── Level records ──

    pub fn record_bias_found(&mut self) -> Result<usize, TransitionError> {
        self.ensure_on(LevelId::BiasScan)?;
        self.ensure_open(LevelId::BiasScan)?;
        self.bias.found += 1;
        self.apply_correct_answer(LevelId::BiasScan, rules::BIAS_DELTA)?;
        Ok(self.bias.found)
    }

    pub fn record_story_placed(&mut self) -> Result<usize, TransitionError> {
        self.ensure_on(LevelId::Storyline)?;
        self.ensure_open(LevelId::Storyline)?;
        self.timeline.placed += 1;
        self.apply_correct_answer(LevelId::Storyline, rules::STORY_DELTA)?;
        Ok(self.timeline.placed)
    }

    /// One answer per question, in order. Correctness only changes the score
    /// and the `correct` counter; the question index always advances.
    pub fn record_quiz_answer(&mut self, level: LevelId, correct: bool) -> Result<&QuizProgress, TransitionError> {
        Self::ensure_kind(level, LevelKind::Quiz)?;
        self.ensure_on(level)?;
        self.ensure_open(level)?;
        if correct {
            self.apply_correct_answer(level, rules::QUIZ_HIT_DELTA)?;
        } else {
            self.apply_wrong_answer(level, rules::QUIZ_MISS_PENALTY)?;
        }
        let q = self.quiz_mut(level);
        q.answered += 1;
        if correct {
            q.correct += 1;
        }
        Ok(self.quiz(level))
    }

    pub fn battle_enemy_attack(&mut self, level: LevelId, damage: u32) -> Result<&BattleProgress, TransitionError> {
        Self::ensure_kind(level, LevelKind::Battle)?;
        self.ensure_on(level)?;
        let b = self.battle_mut(level);
        b.player_hp = rules::lower(b.player_hp, damage);
        Ok(self.battle(level))
    }

    pub fn battle_play_card(&mut self, level: LevelId, power: i32) -> Result<CardResult, TransitionError> {
        Self::ensure_kind(level, LevelKind::Battle)?;
        self.ensure_on(level)?;
        self.ensure_open(level)?;
        let spec = content::battle_for(level);
        let outcome = rules::card_outcome(power);

        let b = self.battle_mut(level);
        match outcome {
            CardOutcome::Effective { power } => {
                b.meter = rules::raise(b.meter, power, rules::METER_MAX);
                b.enemy_hp = rules::lower(b.enemy_hp, power);
            }
            CardOutcome::Ineffective { self_damage } => {
                b.player_hp = rules::lower(b.player_hp, self_damage);
            }
        }
        b.round += 1;
        let player_down = b.player_hp == 0;

        match outcome {
            CardOutcome::Effective { .. } if spec.card_delta > 0 => {
                self.apply_correct_answer(level, spec.card_delta.unsigned_abs())?;
            }
            CardOutcome::Ineffective { .. } => {
                self.energy = rules::lower(self.energy, rules::MISS_ENERGY_DRAIN);
            }
            _ => {}
        }

        Ok(CardResult { outcome, won: self.level_complete(level), player_down })
    }

    /// Soft reset after the player's hp ran out. The encounter goes on.
    pub fn battle_soft_reset(&mut self, level: LevelId) -> Result<&BattleProgress, TransitionError> {
        Self::ensure_kind(level, LevelKind::Battle)?;
        self.ensure_on(level)?;
        let spec = content::battle_for(level);
        let b = self.battle_mut(level);
        *b = BattleProgress::new(spec, b.seed_meter);
        info!(?level, "battle soft reset");
        Ok(self.battle(level))
    }

    // ── Side content ──

    /// Hidden coffee cup. Only on level screens, only once.
    pub fn collect_coffee(&mut self) -> bool {
        if self.coffee_found || self.screen.level().is_none() {
            return false;
        }
        self.coffee_found = true;
        self.energy = rules::raise(self.energy, rules::COFFEE_ENERGY, rules::ENERGY_MAX);
        info!(energy = self.energy, "coffee found");
        true
    }

    /// The fax joke. Only on level screens. Returns whether the modal should show.
    pub fn trigger_fax(&mut self) -> bool {
        if self.screen.level().is_none() {
            return false;
        }
        self.fax_triggered = true;
        true
    }

    // ── Sequencing ──

    /// Completion predicate of `level`, read from its record.
    pub fn level_complete(&self, level: LevelId) -> bool {
        match level {
            LevelId::BiasScan => self.bias.found >= content::BIAS_ZONES.len(),
            LevelId::Storyline => self.timeline.placed >= content::TIMELINE_SLOTS.len(),
            LevelId::DataLab | LevelId::FramingQuiz => {
                self.quiz(level).answered >= content::quiz_for(level).len()
            }
            LevelId::Skirmish | LevelId::BossBattle => {
                let b = self.battle(level);
                let spec = content::battle_for(level);
                rules::battle_won(b.enemy_hp, b.meter, spec.final_win.as_ref())
            }
        }
    }

    /// Move to the next screen. Levels only advance once their predicate holds.
    pub fn advance_screen(&mut self) -> Result<Screen, TransitionError> {
        let next = match self.screen {
            Screen::Start => Screen::Level(LevelId::FIRST),
            Screen::Level(level) => {
                if !self.level_complete(level) {
                    return Err(TransitionError::Incomplete(level));
                }
                match level.next() {
                    Some(n) => Screen::Level(n),
                    None => Screen::Win,
                }
            }
            Screen::Win => return Err(TransitionError::Finished),
        };

        match next {
            Screen::Level(LevelId::BossBattle) => {
                // Hand-off: the boss meter starts where approval ended up.
                self.boss = BattleProgress::new(&content::BOSS, self.approval);
            }
            Screen::Win => {
                self.approval = self.boss.meter;
            }
            _ => {}
        }

        info!(from = ?self.screen, to = ?next, approval = self.approval, "screen");
        self.screen = next;
        Ok(next)
    }

    // ── Accessors ──

    pub fn quiz(&self, level: LevelId) -> &QuizProgress {
        match level {
            LevelId::FramingQuiz => &self.framing_quiz,
            _ => &self.data_quiz,
        }
    }

    fn quiz_mut(&mut self, level: LevelId) -> &mut QuizProgress {
        match level {
            LevelId::FramingQuiz => &mut self.framing_quiz,
            _ => &mut self.data_quiz,
        }
    }

    pub fn battle(&self, level: LevelId) -> &BattleProgress {
        match level {
            LevelId::BossBattle => &self.boss,
            _ => &self.skirmish,
        }
    }

    fn battle_mut(&mut self, level: LevelId) -> &mut BattleProgress {
        match level {
            LevelId::BossBattle => &mut self.boss,
            _ => &mut self.skirmish,
        }
    }

    pub fn hud(&self) -> Hud {
        let score = match self.screen {
            Screen::Level(LevelId::BossBattle) => self.boss.meter,
            _ => self.approval,
        };
        let level = match self.screen {
            Screen::Start => 0,
            Screen::Level(l) => l.number(),
            Screen::Win => LevelId::ALL.len(),
        };
        Hud { score, level, total: LevelId::ALL.len(), energy: self.energy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk the state to `level` by satisfying every earlier predicate directly.
    fn at_level(level: LevelId) -> GameState {
        let mut g = GameState::new();
        g.advance_screen().unwrap();
        while g.screen != Screen::Level(level) {
            let cur = g.screen.level().unwrap();
            force_complete(&mut g, cur);
            g.advance_screen().unwrap();
        }
        g
    }

    fn force_complete(g: &mut GameState, level: LevelId) {
        match level {
            LevelId::BiasScan => g.bias.found = 3,
            LevelId::Storyline => g.timeline.placed = 5,
            LevelId::DataLab => g.data_quiz.answered = 3,
            LevelId::FramingQuiz => g.framing_quiz.answered = 3,
            LevelId::Skirmish => g.skirmish.enemy_hp = 0,
            LevelId::BossBattle => g.boss.enemy_hp = 0,
        }
    }

    #[test]
    fn starts_on_start_screen() {
        let g = GameState::new();
        assert_eq!(g.screen, Screen::Start);
        assert_eq!(g.approval, 30);
        assert_eq!(g.hud().level, 0);
    }

    #[test]
    fn example_three_biases() {
        let mut g = GameState::new();
        g.advance_screen().unwrap();
        for _ in 0..3 {
            g.record_bias_found().unwrap();
        }
        assert_eq!(g.approval, 45);
        assert!(g.level_complete(LevelId::BiasScan));
        assert_eq!(g.advance_screen(), Ok(Screen::Level(LevelId::Skirmish)));
    }

    #[test]
    fn cannot_advance_incomplete_level() {
        let mut g = GameState::new();
        g.advance_screen().unwrap();
        g.record_bias_found().unwrap();
        assert_eq!(g.advance_screen(), Err(TransitionError::Incomplete(LevelId::BiasScan)));
        assert_eq!(g.screen, Screen::Level(LevelId::BiasScan));
    }

    #[test]
    fn records_only_writable_on_their_screen() {
        let mut g = GameState::new();
        assert!(matches!(g.record_bias_found(), Err(TransitionError::InactiveLevel { .. })));
        g.advance_screen().unwrap();
        assert!(g.record_story_placed().is_err());
        assert!(g.record_quiz_answer(LevelId::DataLab, true).is_err());
        assert!(g.battle_play_card(LevelId::BossBattle, 20).is_err());
        assert_eq!(g.timeline.placed, 0);
        assert_eq!(g.boss.round, 0);
    }

    #[test]
    fn wrong_kind_is_rejected() {
        let mut g = at_level(LevelId::DataLab);
        assert_eq!(
            g.battle_play_card(LevelId::DataLab, 10),
            Err(TransitionError::WrongKind(LevelId::DataLab, LevelKind::Battle)),
        );
    }

    #[test]
    fn soft_cap_before_boss() {
        let mut g = at_level(LevelId::Storyline);
        for _ in 0..20 {
            g.apply_correct_answer(LevelId::Storyline, 10).unwrap();
            assert!(g.approval <= 80);
        }
        assert_eq!(g.approval, 80);
    }

    #[test]
    fn quiz_counts_every_answer() {
        let mut g = at_level(LevelId::DataLab);
        g.approval = 50;
        g.record_quiz_answer(LevelId::DataLab, true).unwrap();
        g.record_quiz_answer(LevelId::DataLab, false).unwrap();
        assert!(!g.level_complete(LevelId::DataLab));
        let q = g.record_quiz_answer(LevelId::DataLab, true).unwrap().clone();
        assert_eq!(q, QuizProgress { answered: 3, correct: 2 });
        assert_eq!(g.approval, 50 + 10 - 5 + 10);
        assert!(g.level_complete(LevelId::DataLab));
    }

    #[test]
    fn wrong_answer_floors_at_zero() {
        let mut g = at_level(LevelId::FramingQuiz);
        g.approval = 3;
        g.record_quiz_answer(LevelId::FramingQuiz, false).unwrap();
        assert_eq!(g.approval, 0);
    }

    #[test]
    fn boss_meter_seeded_from_approval() {
        let mut g = at_level(LevelId::FramingQuiz);
        g.approval = 72;
        force_complete(&mut g, LevelId::FramingQuiz);
        g.advance_screen().unwrap();
        assert_eq!(g.boss.meter, 72);
        assert_eq!(g.boss.seed_meter, 72);
        assert_eq!(g.hud().score, 72);
    }

    #[test]
    fn boss_card_math() {
        let mut g = at_level(LevelId::BossBattle);
        g.boss.meter = 60;
        let r = g.battle_play_card(LevelId::BossBattle, 25).unwrap();
        assert_eq!(r.outcome, CardOutcome::Effective { power: 25 });
        assert_eq!((g.boss.meter, g.boss.enemy_hp, g.boss.round), (85, 75, 1));
        assert!(!r.won);

        let r = g.battle_play_card(LevelId::BossBattle, 0).unwrap();
        assert_eq!(r.outcome, CardOutcome::Ineffective { self_damage: 10 });
        assert_eq!((g.boss.player_hp, g.boss.enemy_hp, g.boss.round), (90, 75, 2));
    }

    #[test]
    fn boss_conjunction_win() {
        let mut g = at_level(LevelId::BossBattle);
        g.boss.meter = 80;
        g.boss.enemy_hp = 50;
        let r = g.battle_play_card(LevelId::BossBattle, 20).unwrap();
        assert!(r.won); // meter 100, hp 30
        assert_eq!(g.advance_screen(), Ok(Screen::Win));
        assert_eq!(g.approval, 100);
        assert_eq!(g.advance_screen(), Err(TransitionError::Finished));
    }

    #[test]
    fn boss_meter_alone_does_not_win() {
        let mut g = at_level(LevelId::BossBattle);
        g.boss.meter = 95;
        let r = g.battle_play_card(LevelId::BossBattle, 15).unwrap();
        assert!(!r.won);
        assert_eq!(g.boss.enemy_hp, 85);
    }

    #[test]
    fn soft_reset_restores_initial_pools() {
        let mut g = at_level(LevelId::BossBattle);
        let seed = g.boss.seed_meter;
        g.battle_play_card(LevelId::BossBattle, 20).unwrap();
        g.battle_enemy_attack(LevelId::BossBattle, 500).unwrap();
        assert_eq!(g.boss.player_hp, 0);
        g.battle_soft_reset(LevelId::BossBattle).unwrap();
        assert_eq!(g.boss, BattleProgress {
            player_hp: 100, enemy_hp: 100, meter: seed, seed_meter: seed, round: 0,
        });
        assert_eq!(g.screen, Screen::Level(LevelId::BossBattle));
    }

    #[test]
    fn skirmish_cards_score_approval() {
        let mut g = at_level(LevelId::Skirmish);
        let before = g.approval;
        g.battle_play_card(LevelId::Skirmish, 20).unwrap();
        assert_eq!(g.approval, before + 5);
        g.battle_play_card(LevelId::Skirmish, -5).unwrap();
        assert_eq!(g.approval, before + 5);
        assert_eq!(g.skirmish.player_hp, 85);
    }

    #[test]
    fn skirmish_completes_at_zero_hp() {
        let mut g = at_level(LevelId::Skirmish);
        let mut won = false;
        for _ in 0..3 {
            won = g.battle_play_card(LevelId::Skirmish, 20).unwrap().won;
        }
        assert!(won);
        assert_eq!(g.skirmish.enemy_hp, 0);
    }

    #[test]
    fn restart_clears_everything() {
        let mut g = at_level(LevelId::DataLab);
        g.collect_coffee();
        g.trigger_fax();
        g.record_quiz_answer(LevelId::DataLab, true).unwrap();
        g.restart();
        assert_eq!(g, GameState::new());
        assert!(!g.coffee_found);
        assert!(!g.fax_triggered);
    }

    #[test]
    fn coffee_once_and_only_in_levels() {
        let mut g = GameState::new();
        assert!(!g.collect_coffee());
        g.advance_screen().unwrap();
        let approval = g.approval;
        assert!(g.collect_coffee());
        assert!(!g.collect_coffee());
        assert_eq!(g.energy, 90);
        assert_eq!(g.approval, approval);
    }

    #[test]
    fn hud_tracks_screen() {
        let g = at_level(LevelId::Storyline);
        let hud = g.hud();
        assert_eq!((hud.level, hud.total, hud.score), (4, 6, g.approval));
    }

    #[test]
    fn records_stop_once_level_is_complete() {
        let mut g = GameState::new();
        g.advance_screen().unwrap();
        for _ in 0..3 {
            g.record_bias_found().unwrap();
        }
        assert_eq!(g.record_bias_found(), Err(TransitionError::AlreadyComplete(LevelId::BiasScan)));
        assert_eq!((g.bias.found, g.approval), (3, 45));

        let mut g = at_level(LevelId::DataLab);
        g.approval = 50;
        for _ in 0..3 {
            g.record_quiz_answer(LevelId::DataLab, true).unwrap();
        }
        assert_eq!(
            g.record_quiz_answer(LevelId::DataLab, false),
            Err(TransitionError::AlreadyComplete(LevelId::DataLab)),
        );
        assert_eq!((g.data_quiz.answered, g.approval), (3, 80));

        let mut g = at_level(LevelId::Storyline);
        g.timeline.placed = 5;
        assert_eq!(g.record_story_placed(), Err(TransitionError::AlreadyComplete(LevelId::Storyline)));
        assert_eq!(g.timeline.placed, 5);
    }

    #[test]
    fn no_cards_after_a_won_battle() {
        let mut g = at_level(LevelId::BossBattle);
        g.boss.enemy_hp = 10;
        assert!(g.battle_play_card(LevelId::BossBattle, 20).unwrap().won);
        let (round, approval) = (g.boss.round, g.approval);
        assert_eq!(
            g.battle_play_card(LevelId::BossBattle, 20),
            Err(TransitionError::AlreadyComplete(LevelId::BossBattle)),
        );
        assert_eq!((g.boss.round, g.approval), (round, approval));
    }
}
