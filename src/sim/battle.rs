/// Battle widget (levels 2 and 6): a small turn machine.
///
/// ```text
///   AwaitingEnemy ──enemy_turn──▶ AwaitingPlayer ──play_card──▶ Resolving
///        ▲                                                       │
///        └──────────────── settle (not won) ◀────────────────────┘
///                          settle (won) ──▶ Finished
///   soft reset (player hp 0) from any state but Finished ──▶ AwaitingEnemy
/// ```
///
/// `Finished` is terminal: every operation returns `None` / `Idle` there,
/// which is what keeps the win from being signalled twice.
///
/// The widget owns no hit points. It picks the attack and the dealt hand,
/// keeps a short log, and the shell applies the numbers to `GameState`.

use crate::domain::content::{self, Attack, BattleSpec, Card};
use crate::domain::level::LevelId;
use crate::domain::order;
use crate::domain::rules::CardOutcome;
use crate::sim::feedback::Signal;
use crate::sim::game::{BattleProgress, CardResult};

const LOG_LINES: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TurnState {
    AwaitingEnemy,
    AwaitingPlayer,
    Resolving,
    Finished,
}

pub struct BattleWidget {
    spec: &'static BattleSpec,
    turn: TurnState,
    /// Deck indices of the dealt hand, in display order.
    hand: Vec<usize>,
    current_attack: Option<&'static Attack>,
    log: Vec<String>,
    seed: u64,
    deals: u64,
}

impl BattleWidget {
    pub fn new(level: LevelId, seed: u64) -> Self {
        BattleWidget {
            spec: content::battle_for(level),
            turn: TurnState::AwaitingEnemy,
            hand: Vec::new(),
            current_attack: None,
            log: Vec::new(),
            seed,
            deals: 0,
        }
    }

    pub fn spec(&self) -> &'static BattleSpec {
        self.spec
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn current_attack(&self) -> Option<&'static Attack> {
        self.current_attack
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Cards of the dealt hand, in display order.
    pub fn hand(&self) -> Vec<&'static Card> {
        let deck = self.spec.deck;
        self.hand.iter().map(|&i| &deck[i]).collect()
    }

    fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.log.len() > LOG_LINES {
            self.log.remove(0);
        }
    }

    fn deal(&mut self) {
        let perm = order::shuffled(self.spec.deck.len(), self.seed.wrapping_add(self.deals));
        self.deals += 1;
        self.hand = perm.into_iter().take(self.spec.hand_size).collect();
    }

    /// The opponent's move. The attack follows the round counter, so the
    /// sequence restarts after a soft reset.
    pub fn enemy_turn(&mut self, progress: &BattleProgress) -> Option<&'static Attack> {
        if self.turn != TurnState::AwaitingEnemy || self.spec.attacks.is_empty() {
            return None;
        }
        let attacks = self.spec.attacks;
        let attack = &attacks[progress.round as usize % attacks.len()];
        self.current_attack = Some(attack);
        self.push_log(format!("{} uses {}! (-{} HP)", self.spec.opponent, attack.name, attack.damage));
        self.deal();
        self.turn = TurnState::AwaitingPlayer;
        Some(attack)
    }

    /// Play the card shown at `pos` of the hand.
    pub fn play_card(&mut self, pos: usize) -> Option<&'static Card> {
        if self.turn != TurnState::AwaitingPlayer {
            return None;
        }
        let idx = *self.hand.get(pos)?;
        let card = &self.spec.deck[idx];
        self.turn = TurnState::Resolving;
        Some(card)
    }

    /// Record what the played card did.
    pub fn resolve(&mut self, card: &Card, result: &CardResult) {
        let line = match result.outcome {
            CardOutcome::Effective { power } => format!("You play {}: +{} persuasion", card.name, power),
            CardOutcome::Ineffective { self_damage } => {
                format!("You play {}: it backfires (-{} HP)", card.name, self_damage)
            }
        };
        self.push_log(line);
    }

    /// End of the resolution pause. `won` is the level's completion predicate.
    pub fn settle(&mut self, won: bool) -> Signal {
        if self.turn != TurnState::Resolving {
            return Signal::Idle;
        }
        if won {
            self.turn = TurnState::Finished;
            self.push_log(format!("{} is convinced!", self.spec.opponent));
            Signal::Complete
        } else {
            self.turn = TurnState::AwaitingEnemy;
            Signal::Idle
        }
    }

    /// The player ran out of hp. The encounter starts over.
    pub fn soft_reset(&mut self) -> bool {
        if self.turn == TurnState::Finished {
            return false;
        }
        self.turn = TurnState::AwaitingEnemy;
        self.hand.clear();
        self.current_attack = None;
        self.push_log("You regroup and try again.".to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules;

    fn progress(level: LevelId) -> BattleProgress {
        BattleProgress::new(content::battle_for(level), 50)
    }

    fn result(power: i32, won: bool) -> CardResult {
        CardResult { outcome: rules::card_outcome(power), won, player_down: false }
    }

    #[test]
    fn full_turn_cycle() {
        let mut w = BattleWidget::new(LevelId::BossBattle, 3);
        let p = progress(LevelId::BossBattle);
        assert_eq!(w.turn(), TurnState::AwaitingEnemy);
        assert!(w.play_card(0).is_none());

        let attack = w.enemy_turn(&p).unwrap();
        assert_eq!(attack.name, content::BOSS_ATTACKS[0].name);
        assert_eq!(w.turn(), TurnState::AwaitingPlayer);
        assert_eq!(w.hand().len(), 4);
        assert!(w.enemy_turn(&p).is_none());

        let card = w.play_card(1).unwrap();
        assert_eq!(w.turn(), TurnState::Resolving);
        w.resolve(card, &result(card.power, false));
        assert_eq!(w.settle(false), Signal::Idle);
        assert_eq!(w.turn(), TurnState::AwaitingEnemy);
    }

    #[test]
    fn attack_follows_round() {
        let mut w = BattleWidget::new(LevelId::BossBattle, 3);
        let mut p = progress(LevelId::BossBattle);
        p.round = 5;
        let attack = w.enemy_turn(&p).unwrap();
        assert_eq!(attack.name, content::BOSS_ATTACKS[1].name);
    }

    #[test]
    fn hand_is_distinct_cards_of_the_deck() {
        let mut w = BattleWidget::new(LevelId::Skirmish, 11);
        w.enemy_turn(&progress(LevelId::Skirmish));
        let mut names: Vec<_> = w.hand().iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), content::SKIRMISH.hand_size);
    }

    #[test]
    fn win_signalled_once_then_inert() {
        let mut w = BattleWidget::new(LevelId::Skirmish, 0);
        let p = progress(LevelId::Skirmish);
        w.enemy_turn(&p);
        w.play_card(0);
        assert_eq!(w.settle(true), Signal::Complete);
        assert_eq!(w.turn(), TurnState::Finished);

        assert_eq!(w.settle(true), Signal::Idle);
        assert!(w.enemy_turn(&p).is_none());
        assert!(w.play_card(0).is_none());
        assert!(!w.soft_reset());
    }

    #[test]
    fn soft_reset_waits_for_enemy() {
        let mut w = BattleWidget::new(LevelId::BossBattle, 0);
        w.enemy_turn(&progress(LevelId::BossBattle));
        assert!(w.soft_reset());
        assert_eq!(w.turn(), TurnState::AwaitingEnemy);
        assert!(w.hand().is_empty());
        assert!(w.current_attack().is_none());
    }

    #[test]
    fn log_is_bounded() {
        let mut w = BattleWidget::new(LevelId::Skirmish, 0);
        let p = progress(LevelId::Skirmish);
        for _ in 0..10 {
            w.enemy_turn(&p);
            let card = w.play_card(0).unwrap();
            w.resolve(card, &result(card.power, false));
            w.settle(false);
        }
        assert_eq!(w.log().len(), LOG_LINES);
    }

    #[test]
    fn settle_outside_resolving_is_idle() {
        let mut w = BattleWidget::new(LevelId::Skirmish, 0);
        assert_eq!(w.settle(true), Signal::Idle);
        assert_eq!(w.turn(), TurnState::AwaitingEnemy);
    }
}
