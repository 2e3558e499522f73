/// Scoring and battle rules, truth-table driven.
///
/// Pure functions over plain numbers. No state, no side effects. The game
/// state machine calls these for every mutation so that clamping lives in
/// exactly one place.
///
/// ## Approval Truth Table
///
/// ┌────────────────────────────────┬──────────────┬─────────────────────┐
/// │ Action                          │ Delta        │ Clamp               │
/// ├────────────────────────────────┼──────────────┼─────────────────────┤
/// │ Bias zone labelled correctly    │ +5           │ ≤ cap               │
/// │ Story block placed correctly    │ +5           │ ≤ cap               │
/// │ Quiz answer correct             │ +10          │ ≤ cap               │
/// │ Quiz answer wrong               │ −5           │ ≥ 0                 │
/// │ Skirmish card, power > 0        │ +5           │ ≤ cap               │
/// │ Any card, power ≤ 0             │ 0            │ (failure)           │
/// └────────────────────────────────┴──────────────┴─────────────────────┘
///
/// cap = 80 on every screen before the boss battle, 100 during it.
/// An addition never lowers the value, a subtraction never raises it.
///
/// ## Card Truth Table
///
/// ┌──────────────┬──────────────────────────────┬──────────────────────┐
/// │ Card power    │ Opponent                      │ Player               │
/// ├──────────────┼──────────────────────────────┼──────────────────────┤
/// │ p > 0         │ enemy_hp −= p, meter += p     │ –                    │
/// │ p ≤ 0         │ –                             │ hp −= 10 + |p|       │
/// └──────────────┴──────────────────────────────┴──────────────────────┘
///
/// ## Battle Win
///
/// ┌───────────────────────────────────────────────┬────────┐
/// │ Condition                                      │ Won?   │
/// ├───────────────────────────────────────────────┼────────┤
/// │ enemy_hp == 0                                  │ YES    │
/// │ final battle: meter ≥ 85 AND enemy_hp ≤ 30     │ YES    │
/// │ otherwise                                      │ NO     │
/// └───────────────────────────────────────────────┴────────┘

use super::content::FinalWin;
use super::level::LevelId;

pub const INITIAL_APPROVAL: u32 = 30;
pub const APPROVAL_MAX: u32 = 100;
pub const SOFT_CAP: u32 = 80;

pub const BIAS_DELTA: u32 = 5;
pub const STORY_DELTA: u32 = 5;
pub const QUIZ_HIT_DELTA: u32 = 10;
pub const QUIZ_MISS_PENALTY: u32 = 5;

pub const METER_MAX: u32 = 100;
pub const SELF_DAMAGE: u32 = 10;

pub const INITIAL_ENERGY: u32 = 60;
pub const ENERGY_MAX: u32 = 100;
pub const COFFEE_ENERGY: u32 = 30;
pub const MISS_ENERGY_DRAIN: u32 = 5;

// ── Approval ──

/// Upper bound for approval while `level` is on screen.
/// `None` (start / win screens) uses the global maximum.
pub fn approval_cap(level: Option<LevelId>) -> u32 {
    match level {
        Some(l) if !l.is_final() => SOFT_CAP,
        _ => APPROVAL_MAX,
    }
}

/// Clamped addition. Never lowers `value`, even if it already sits above `cap`.
pub fn raise(value: u32, delta: u32, cap: u32) -> u32 {
    value.saturating_add(delta).min(cap).max(value)
}

/// Clamped subtraction, floor 0.
pub fn lower(value: u32, delta: u32) -> u32 {
    value.saturating_sub(delta)
}

// ── Cards ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardOutcome {
    /// Moves the opponent toward defeat and raises the meter.
    Effective { power: u32 },
    /// No progress. The player pays for it.
    Ineffective { self_damage: u32 },
}

pub fn card_outcome(power: i32) -> CardOutcome {
    if power > 0 {
        CardOutcome::Effective { power: power.unsigned_abs() }
    } else {
        CardOutcome::Ineffective { self_damage: SELF_DAMAGE + power.unsigned_abs() }
    }
}

/// See the battle win table above.
pub fn battle_won(enemy_hp: u32, meter: u32, final_win: Option<&FinalWin>) -> bool {
    if enemy_hp == 0 {
        return true;
    }
    match final_win {
        Some(fw) => meter >= fw.meter_min && enemy_hp <= fw.enemy_max,
        None => false,
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const FW: FinalWin = FinalWin { meter_min: 85, enemy_max: 30 };

    #[test]
    fn soft_cap_before_final_level() {
        for level in LevelId::ALL {
            let expect = if level == LevelId::BossBattle { 100 } else { 80 };
            assert_eq!(approval_cap(Some(level)), expect, "{level:?}");
        }
        assert_eq!(approval_cap(None), 100);
    }

    #[test]
    fn raise_clamps_to_cap() {
        assert_eq!(raise(30, 5, 80), 35);
        assert_eq!(raise(78, 5, 80), 80);
        assert_eq!(raise(80, 10, 80), 80);
        assert_eq!(raise(99, 10, 100), 100);
    }

    #[test]
    fn raise_never_lowers() {
        // Above the soft cap (e.g. carried over from the boss meter)
        assert_eq!(raise(95, 5, 80), 95);
        assert_eq!(raise(u32::MAX, 1, 100), u32::MAX);
    }

    #[test]
    fn lower_floors_at_zero() {
        assert_eq!(lower(12, 5), 7);
        assert_eq!(lower(3, 5), 0);
        assert_eq!(lower(0, 5), 0);
    }

    #[test]
    fn clamping_holds_for_every_step() {
        let mut v = INITIAL_APPROVAL;
        let steps: [(bool, u32); 12] = [
            (true, 10), (true, 10), (true, 10), (false, 5), (true, 10), (true, 10),
            (false, 5), (false, 5), (true, 10), (true, 10), (true, 10), (true, 10),
        ];
        for (up, d) in steps {
            let before = v;
            v = if up { raise(v, d, SOFT_CAP) } else { lower(v, d) };
            assert!(v <= SOFT_CAP);
            if up { assert!(v >= before) } else { assert!(v <= before) }
        }
        assert_eq!(v, SOFT_CAP);
    }

    #[test]
    fn positive_cards_are_effective() {
        assert_eq!(card_outcome(25), CardOutcome::Effective { power: 25 });
        assert_eq!(card_outcome(1), CardOutcome::Effective { power: 1 });
    }

    #[test]
    fn zero_and_negative_cards_backfire() {
        assert_eq!(card_outcome(0), CardOutcome::Ineffective { self_damage: 10 });
        assert_eq!(card_outcome(-5), CardOutcome::Ineffective { self_damage: 15 });
    }

    #[test]
    fn enemy_at_zero_always_wins() {
        assert!(battle_won(0, 0, None));
        assert!(battle_won(0, 0, Some(&FW)));
    }

    #[test]
    fn final_win_needs_both_thresholds() {
        assert!(battle_won(30, 85, Some(&FW)));
        assert!(battle_won(10, 100, Some(&FW)));
        assert!(!battle_won(31, 100, Some(&FW))); // meter alone
        assert!(!battle_won(5, 84, Some(&FW)));   // hp alone
        assert!(!battle_won(30, 85, None));       // not the final battle
    }
}
