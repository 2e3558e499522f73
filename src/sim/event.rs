/// Session input and output.
///
/// `Action` is what the input layer (keyboard or gamepad) produces.
/// `GameEvent` is what the session emits; the presentation layer consumes
/// these for sound.

use crate::domain::level::LevelId;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Action {
    Up,
    Down,
    Confirm,
    Cancel,
    /// Jump to choice `n` (0-based) and confirm it.
    Pick(usize),
    Restart,
    Quit,
    Coffee,
    Fax,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Click,
    Correct,
    Incorrect,
    EnemyAttack { damage: u32 },
    SoftReset,
    LevelComplete(LevelId),
    Victory,
    CoffeeFound,
    FaxTriggered,
}
