/// Keyboard input: drains crossterm events and maps them to session actions.
///
/// Everything in this game is a one-shot choice, so only Press events
/// count. Repeat events only scroll the cursor (a held arrow key); a held
/// Enter never answers a second question. Release events are ignored.
///
/// Key map:
///   ↑ ↓ / W S / K J     →  Up / Down
///   Enter / Space       →  Confirm
///   Esc / Backspace     →  Cancel
///   1 … 9               →  Pick that row
///   R / F2              →  Restart
///   Q                   →  Quit (start and win screens only)
///   C                   →  Coffee
///   F                   →  Fax
///   Ctrl+C              →  quit anywhere

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::event::Action;

pub struct InputState {
    /// Actions mapped during the most recent `drain_events()`.
    actions: Vec<Action>,
    ctrl_c: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            actions: Vec::with_capacity(8),
            ctrl_c: false,
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame.
    pub fn drain_events(&mut self) {
        self.actions.clear();
        self.ctrl_c = false;

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if is_ctrl_c(&key) {
                    self.ctrl_c = true;
                } else if let Some(action) = map_key(&key) {
                    self.actions.push(action);
                }
            }
        }
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.ctrl_c
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

/// Pure key → action mapping. Keys with Ctrl or Alt held map to nothing.
pub fn map_key(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match key.kind {
        KeyEventKind::Press => {}
        KeyEventKind::Repeat => {
            return map_code(key.code).filter(|a| matches!(a, Action::Up | Action::Down));
        }
        KeyEventKind::Release => return None,
    }
    map_code(key.code)
}

fn map_code(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc | KeyCode::Backspace => Action::Cancel,
        KeyCode::F(2) => Action::Restart,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' | 'k' => Action::Up,
            's' | 'j' => Action::Down,
            ' ' => Action::Confirm,
            'r' => Action::Restart,
            'q' => Action::Quit,
            'c' => Action::Coffee,
            'f' => Action::Fax,
            d @ '1'..='9' => Action::Pick(d as usize - '1' as usize),
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}
