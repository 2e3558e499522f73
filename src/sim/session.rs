/// Session: the shell around one `GameState`.
///
/// Owns the game state, the widget of the current screen, a cursor over a
/// uniform choice list, the modal layer and the scheduler. Input arrives as
/// `Action`s, time arrives as `tick()`. Both return the `GameEvent`s that
/// happened, for the sound side channel.
///
/// ## Flow per level
///
///   Bias / Timeline / Quiz:  choose → feedback → acknowledge → (complete?)
///   Battle:                  EnemyTurn → card → Settle → EnemyTurn ...
///
/// On completion a short banner is shown and `Timer::AdvanceScreen` moves to
/// the next screen. Every screen change cancels all pending timers first.

use tracing::{debug, error, info};

use crate::config::TimingConfig;
use crate::domain::content::{BIAS_LABELS, BIAS_ZONES, STORY_BLOCKS, TIMELINE_SLOTS};
use crate::domain::level::{LevelId, LevelKind, Screen};
use crate::domain::rules::CardOutcome;
use crate::sim::battle::{BattleWidget, TurnState};
use crate::sim::bias::BiasWidget;
use crate::sim::event::{Action, GameEvent};
use crate::sim::feedback::{Feedback, Signal, Verdict};
use crate::sim::game::{GameState, TransitionError};
use crate::sim::quiz::QuizWidget;
use crate::sim::scheduler::{Scheduler, Timer};
use crate::sim::timeline::TimelineWidget;

/// Widget of the current screen. `Idle` on start and win.
pub enum View {
    Idle,
    Bias(BiasWidget),
    Timeline(TimelineWidget),
    Quiz(QuizWidget),
    Battle(BattleWidget),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Modal {
    Fax,
    LevelComplete(LevelId),
}

/// One selectable row. Disabled rows are shown but cannot be confirmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub enabled: bool,
    pub done: bool,
}

impl Choice {
    fn open(label: impl Into<String>) -> Self {
        Choice { label: label.into(), enabled: true, done: false }
    }

    fn toggled(label: impl Into<String>, done: bool) -> Self {
        Choice { label: label.into(), enabled: !done, done }
    }
}

/// Unwrap a transition result. A rejected transition is a defect in the
/// session, so it is loud in debug builds and logged in release.
fn accept<T>(r: Result<T, TransitionError>) -> Option<T> {
    match r {
        Ok(v) => Some(v),
        Err(e) => {
            error!(error = %e, "rejected transition");
            debug_assert!(false, "rejected transition: {e}");
            None
        }
    }
}

pub struct Session<S: Scheduler> {
    game: GameState,
    view: View,
    cursor: usize,
    modal: Option<Modal>,
    scheduler: S,
    timing: TimingConfig,
    seed: u64,
    /// Bumped on restart so a new run gets fresh presentation orders.
    runs: u64,
}

impl<S: Scheduler> Session<S> {
    pub fn new(timing: TimingConfig, seed: u64, scheduler: S) -> Self {
        info!(seed, "new session");
        Session {
            game: GameState::new(),
            view: View::Idle,
            cursor: 0,
            modal: None,
            scheduler,
            timing,
            seed,
            runs: 0,
        }
    }

    // ── Read access for the renderer ──

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn modal(&self) -> Option<Modal> {
        self.modal
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        match &self.view {
            View::Bias(w) => w.feedback(),
            View::Timeline(w) => w.feedback(),
            View::Quiz(w) => w.feedback(),
            View::Battle(_) | View::Idle => None,
        }
    }

    /// `q` only quits outside of a running campaign.
    pub fn can_quit(&self) -> bool {
        matches!(self.game.screen, Screen::Start | Screen::Win)
    }

    /// Rows the cursor moves over. Empty while a modal or feedback is open.
    pub fn choices(&self) -> Vec<Choice> {
        let Screen::Level(level) = self.game.screen else {
            return Vec::new();
        };
        if self.modal.is_some() || self.feedback().is_some() {
            return Vec::new();
        }
        match &self.view {
            View::Bias(w) => match w.selected() {
                None => BIAS_ZONES.iter().enumerate()
                    .map(|(i, z)| Choice::toggled(z.text, w.is_resolved(i)))
                    .collect(),
                Some(_) => BIAS_LABELS.iter().enumerate()
                    .map(|(i, l)| Choice::toggled(l.label, w.is_label_used(i)))
                    .collect(),
            },
            View::Timeline(w) => match w.selected() {
                None => STORY_BLOCKS.iter().enumerate()
                    .map(|(i, b)| Choice::toggled(b.text, w.is_used(i)))
                    .collect(),
                Some(_) => TIMELINE_SLOTS.iter().enumerate()
                    .map(|(i, s)| match w.slot(i) {
                        Some(b) => Choice::toggled(format!("{}: {}", s.label, STORY_BLOCKS[b].text), true),
                        None => Choice::open(s.label),
                    })
                    .collect(),
            },
            View::Quiz(w) => w.options(self.game.quiz(level)).iter()
                .map(|o| Choice::open(o.label))
                .collect(),
            View::Battle(w) if w.turn() == TurnState::AwaitingPlayer => w.hand().iter()
                .map(|c| Choice::open(format!("{} ({}): {}", c.name, c.effect, c.description)))
                .collect(),
            View::Battle(_) | View::Idle => Vec::new(),
        }
    }

    // ── Input ──

    pub fn handle(&mut self, action: Action) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match action {
            Action::Quit => {}
            Action::Restart => {
                self.restart();
                events.push(GameEvent::Click);
            }
            Action::Coffee => {
                if self.game.collect_coffee() {
                    events.push(GameEvent::CoffeeFound);
                }
            }
            Action::Fax => {
                if self.modal.is_none() && self.game.trigger_fax() {
                    info!("fax");
                    self.modal = Some(Modal::Fax);
                    events.push(GameEvent::FaxTriggered);
                }
            }
            _ if self.modal.is_some() => self.handle_modal(action, &mut events),
            Action::Up => self.move_cursor(false),
            Action::Down => self.move_cursor(true),
            Action::Pick(n) => {
                if n < self.choices().len() {
                    self.cursor = n;
                    self.confirm(&mut events);
                }
            }
            Action::Confirm => self.confirm(&mut events),
            Action::Cancel => self.cancel(&mut events),
        }
        events
    }

    fn handle_modal(&mut self, action: Action, events: &mut Vec<GameEvent>) {
        // The level-complete banner is closed by its timer only.
        if self.modal == Some(Modal::Fax) && matches!(action, Action::Confirm | Action::Cancel) {
            self.modal = None;
            events.push(GameEvent::Click);
        }
    }

    fn move_cursor(&mut self, down: bool) {
        let len = self.choices().len();
        if len == 0 {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    fn cancel(&mut self, events: &mut Vec<GameEvent>) {
        let Screen::Level(level) = self.game.screen else { return };
        if self.feedback().is_some() {
            self.acknowledge(level, events);
            return;
        }
        match &mut self.view {
            View::Bias(w) if w.selected().is_some() => w.cancel(),
            View::Timeline(w) if w.selected().is_some() => w.cancel(),
            _ => return,
        }
        self.cursor = 0;
        events.push(GameEvent::Click);
    }

    fn confirm(&mut self, events: &mut Vec<GameEvent>) {
        match self.game.screen {
            Screen::Start => {
                if accept(self.game.advance_screen()).is_some() {
                    self.enter_screen();
                    events.push(GameEvent::Click);
                }
            }
            Screen::Win => {
                self.restart();
                events.push(GameEvent::Click);
            }
            Screen::Level(level) => {
                if self.feedback().is_some() {
                    self.acknowledge(level, events);
                } else {
                    self.choose(level, events);
                }
            }
        }
    }

    fn acknowledge(&mut self, level: LevelId, events: &mut Vec<GameEvent>) {
        let signal = match &mut self.view {
            View::Bias(w) => w.acknowledge(&self.game.bias),
            View::Timeline(w) => w.acknowledge(&self.game.timeline),
            View::Quiz(w) => w.acknowledge(self.game.quiz(level)),
            View::Battle(_) | View::Idle => Signal::Idle,
        };
        self.cursor = 0;
        events.push(GameEvent::Click);
        if signal == Signal::Complete {
            self.complete_level(level, events);
        }
    }

    /// Apply the row under the cursor to the current widget.
    fn choose(&mut self, level: LevelId, events: &mut Vec<GameEvent>) {
        let idx = self.cursor;
        match self.choices().get(idx) {
            Some(c) if c.enabled => {}
            _ => return,
        }

        let verdict = match &mut self.view {
            View::Bias(w) => {
                if w.selected().is_none() {
                    w.select_zone(idx);
                    events.push(GameEvent::Click);
                    None
                } else {
                    w.choose_bias(idx)
                }
            }
            View::Timeline(w) => {
                if w.selected().is_none() {
                    w.select_block(idx);
                    events.push(GameEvent::Click);
                    None
                } else {
                    w.place(idx)
                }
            }
            View::Quiz(w) => w.answer(idx, self.game.quiz(level)),
            View::Battle(w) => {
                let Some(card) = w.play_card(idx) else { return };
                let Some(result) = accept(self.game.battle_play_card(level, card.power)) else { return };
                w.resolve(card, &result);
                debug!(?level, card = card.name, ?result, "card played");
                events.push(match result.outcome {
                    CardOutcome::Effective { .. } => GameEvent::Correct,
                    CardOutcome::Ineffective { .. } => GameEvent::Incorrect,
                });
                if result.player_down && !result.won {
                    accept(self.game.battle_soft_reset(level));
                    w.soft_reset();
                    self.scheduler.schedule(self.timing.reset_turn_ticks, Timer::EnemyTurn);
                    events.push(GameEvent::SoftReset);
                } else {
                    self.scheduler.schedule(self.timing.settle_ticks, Timer::Settle);
                }
                None
            }
            View::Idle => None,
        };
        self.cursor = 0;

        match verdict {
            Some(Verdict::Correct) => {
                let applied = match level.kind() {
                    LevelKind::Bias => accept(self.game.record_bias_found()).is_some(),
                    LevelKind::Matching => accept(self.game.record_story_placed()).is_some(),
                    LevelKind::Quiz => accept(self.game.record_quiz_answer(level, true)).is_some(),
                    LevelKind::Battle => false,
                };
                if applied {
                    events.push(GameEvent::Correct);
                }
            }
            Some(Verdict::Wrong) => {
                let applied = match level.kind() {
                    LevelKind::Quiz => accept(self.game.record_quiz_answer(level, false)).is_some(),
                    _ => accept(self.game.apply_wrong_answer(level, 0)).is_some(),
                };
                if applied {
                    events.push(GameEvent::Incorrect);
                }
            }
            None => {}
        }
    }

    fn complete_level(&mut self, level: LevelId, events: &mut Vec<GameEvent>) {
        info!(?level, approval = self.game.approval, "level complete");
        self.modal = Some(Modal::LevelComplete(level));
        events.push(if level.is_final() {
            GameEvent::Victory
        } else {
            GameEvent::LevelComplete(level)
        });
        self.scheduler.schedule(self.timing.level_complete_ticks, Timer::AdvanceScreen);
    }

    // ── Time ──

    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let screen = self.game.screen;
        for timer in self.scheduler.tick() {
            // Anything after a screen change belonged to the old screen.
            if self.game.screen != screen {
                break;
            }
            self.fire(timer, &mut events);
        }
        events
    }

    fn fire(&mut self, timer: Timer, events: &mut Vec<GameEvent>) {
        debug!(?timer, "timer");
        if timer == Timer::AdvanceScreen {
            if accept(self.game.advance_screen()).is_some() {
                self.enter_screen();
            }
            return;
        }

        let Screen::Level(level) = self.game.screen else { return };
        let View::Battle(w) = &mut self.view else { return };

        match timer {
            Timer::EnemyTurn => {
                let Some(attack) = w.enemy_turn(self.game.battle(level)) else { return };
                let Some(progress) = accept(self.game.battle_enemy_attack(level, attack.damage)) else { return };
                events.push(GameEvent::EnemyAttack { damage: attack.damage });
                if progress.player_hp == 0 {
                    accept(self.game.battle_soft_reset(level));
                    w.soft_reset();
                    self.scheduler.schedule(self.timing.reset_turn_ticks, Timer::EnemyTurn);
                    events.push(GameEvent::SoftReset);
                }
                self.cursor = 0;
            }
            Timer::Settle => {
                let won = self.game.level_complete(level);
                let signal = w.settle(won);
                let enemy_next = w.turn() == TurnState::AwaitingEnemy;
                match signal {
                    Signal::Complete => self.complete_level(level, events),
                    Signal::Idle if enemy_next => {
                        self.scheduler.schedule(self.timing.enemy_turn_ticks, Timer::EnemyTurn);
                    }
                    Signal::Idle => {}
                }
            }
            Timer::AdvanceScreen => {}
        }
    }

    // ── Screens ──

    fn restart(&mut self) {
        self.game.restart();
        self.runs += 1;
        self.enter_screen();
    }

    /// Mount the widget for the current screen. Pending timers are dropped.
    fn enter_screen(&mut self) {
        self.scheduler.cancel_all();
        self.modal = None;
        self.cursor = 0;
        self.view = match self.game.screen {
            Screen::Level(level) => {
                let seed = self.seed.wrapping_add((self.runs << 8) | level.number() as u64);
                match level.kind() {
                    LevelKind::Bias => View::Bias(BiasWidget::new()),
                    LevelKind::Matching => View::Timeline(TimelineWidget::new()),
                    LevelKind::Quiz => View::Quiz(QuizWidget::new(level, seed)),
                    LevelKind::Battle => View::Battle(BattleWidget::new(level, seed)),
                }
            }
            Screen::Start | Screen::Win => View::Idle,
        };
        if matches!(self.view, View::Battle(_)) {
            self.scheduler.schedule(self.timing.enemy_turn_ticks, Timer::EnemyTurn);
        }
    }
}
