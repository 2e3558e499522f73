/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Up / Down
///   A / Start             →  Confirm
///   B                     →  Cancel
///   Select                →  Restart
///
/// Only edges produce actions. A held button or a stick resting past the
/// deadzone fires once.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::sim::event::Action;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER" => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
    restart: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::A, Btn::Start],
            cancel: vec![Btn::B],
            restart: vec![Btn::Select],
        }
    }
}

impl ActionMap {
    /// First mapping wins when a button is bound twice.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn action_for(&self, btn: Btn) -> Option<Action> {
        if self.confirm.contains(&btn) {
            Some(Action::Confirm)
        } else if self.cancel.contains(&btn) {
            Some(Action::Cancel)
        } else if self.restart.contains(&btn) {
            Some(Action::Restart)
        } else {
            None
        }
    }
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Actions produced by the most recent `update()`.
    actions: Vec<Action>,

    // Stick, as a digital up/down with edge detection
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: i8,

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    action_map: ActionMap,

    pub connected: bool,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = {
            match Gilrs::new() {
                Ok(g) => {
                    let has_pad = g.gamepads().next().is_some();
                    (Some(g), has_pad)
                }
                Err(_) => (None, false),
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            actions: Vec::with_capacity(4),
            stick_y: 0.0,
            stick_dir: 0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load button mapping from config. Lists with no known button name
    /// keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let map = &mut self.action_map;
        let cf = parse_list(&cfg.confirm);
        if !cf.is_empty() { map.confirm = cf; }
        let ca = parse_list(&cfg.cancel);
        if !ca.is_empty() { map.cancel = ca; }
        let rs = parse_list(&cfg.restart);
        if !rs.is_empty() { map.restart = rs; }
    }

    pub fn update(&mut self) {
        self.actions.clear();

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press(btn);
                }
                EventType::AxisChanged(Axis::LeftStickY, value, _) => {
                    self.connected = true;
                    self.stick_y = value;
                }
                EventType::Connected => { self.connected = true; }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_y = 0.0;
                    self.stick_dir = 0;
                }
                _ => {}
            }
        }

        let dir = if self.stick_y > STICK_DEADZONE {
            1
        } else if self.stick_y < -STICK_DEADZONE {
            -1
        } else {
            0
        };
        if dir != self.stick_dir {
            match dir {
                1 => self.actions.push(Action::Up),
                -1 => self.actions.push(Action::Down),
                _ => {}
            }
            self.stick_dir = dir;
        }
    }

    #[cfg(feature = "gamepad")]
    fn press(&mut self, gilrs_btn: Button) {
        match gilrs_btn {
            Button::DPadUp => self.actions.push(Action::Up),
            Button::DPadDown => self.actions.push(Action::Down),
            other => {
                if let Some(action) = Btn::from_gilrs(other).and_then(|b| self.action_map.action_for(b)) {
                    self.actions.push(action);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_names_are_case_insensitive() {
        assert_eq!(Btn::from_name("start"), Some(Btn::Start));
        assert_eq!(Btn::from_name("South"), Some(Btn::A));
        assert_eq!(Btn::from_name("back"), Some(Btn::Select));
        assert_eq!(Btn::from_name("turbo"), None);
    }

    #[test]
    fn default_mapping() {
        let map = ActionMap::default();
        assert_eq!(map.action_for(Btn::A), Some(Action::Confirm));
        assert_eq!(map.action_for(Btn::B), Some(Action::Cancel));
        assert_eq!(map.action_for(Btn::Select), Some(Action::Restart));
        assert_eq!(map.action_for(Btn::Y), None);
    }

    #[test]
    fn config_overrides_and_ignores_unknown_names() {
        let mut gp = GamepadState::new();
        gp.load_button_config(&GamepadConfig {
            confirm: vec!["X".into()],
            cancel: vec!["nonsense".into()],
            restart: vec!["Start".into()],
        });
        assert_eq!(gp.action_map.action_for(Btn::X), Some(Action::Confirm));
        assert_eq!(gp.action_map.action_for(Btn::B), Some(Action::Cancel));
        assert_eq!(gp.action_map.action_for(Btn::Start), Some(Action::Restart));
    }
}
