//! Viewer actions and the keys that trigger them.
//!
//! [`InputMap`] says which physical keys trigger which [`Action`]. Each tick
//! [`ActionResolver`] reads the [`KeyboardState`] and fills an
//! [`ActionState`] with the actions that fired.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use winit::keyboard::KeyCode;

use crate::keyboard::KeyboardState;

/// Number of focus hotkey slots: the sun and eight planets.
pub const FOCUS_SLOTS: u8 = 9;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Action {
    TogglePlay,
    /// Return to the overview pose.
    Reset,
    /// Focus a body by catalog slot: 0 is the sun, 1..=8 the planets
    /// outward from Mercury.
    Focus(u8),
    /// Dismiss the info record but leave the camera where it is.
    CloseInfo,
    SpeedUp,
    SpeedDown,
    Quit,
}

impl Action {
    /// Every action, in a stable order.
    pub const ALL: [Action; 15] = [
        Action::TogglePlay,
        Action::Reset,
        Action::Focus(0),
        Action::Focus(1),
        Action::Focus(2),
        Action::Focus(3),
        Action::Focus(4),
        Action::Focus(5),
        Action::Focus(6),
        Action::Focus(7),
        Action::Focus(8),
        Action::CloseInfo,
        Action::SpeedUp,
        Action::SpeedDown,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::TogglePlay => f.write_str("TogglePlay"),
            Action::Reset => f.write_str("Reset"),
            Action::Focus(slot) => write!(f, "Focus{slot}"),
            Action::CloseInfo => f.write_str("CloseInfo"),
            Action::SpeedUp => f.write_str("SpeedUp"),
            Action::SpeedDown => f.write_str("SpeedDown"),
            Action::Quit => f.write_str("Quit"),
        }
    }
}

impl FromStr for Action {
    type Err = crate::keybindings::BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Action::ALL
            .into_iter()
            .find(|action| action.to_string().eq_ignore_ascii_case(name))
            .ok_or_else(|| crate::keybindings::BindingError::UnknownAction(name.to_string()))
    }
}

/// Keys bound to each action. Any bound key triggers its action.
#[derive(Debug, Clone, PartialEq)]
pub struct InputMap {
    pub bindings: HashMap<Action, Vec<KeyCode>>,
}

impl Default for InputMap {
    fn default() -> Self {
        let mut map = Self::new();
        map.set_bindings(Action::TogglePlay, vec![KeyCode::Space]);
        map.set_bindings(Action::Reset, vec![KeyCode::Escape, KeyCode::KeyR]);
        const DIGITS: [KeyCode; FOCUS_SLOTS as usize] = [
            KeyCode::Digit0,
            KeyCode::Digit1,
            KeyCode::Digit2,
            KeyCode::Digit3,
            KeyCode::Digit4,
            KeyCode::Digit5,
            KeyCode::Digit6,
            KeyCode::Digit7,
            KeyCode::Digit8,
        ];
        for (slot, key) in DIGITS.into_iter().enumerate() {
            map.set_bindings(Action::Focus(slot as u8), vec![key]);
        }
        map.set_bindings(Action::CloseInfo, vec![KeyCode::KeyC]);
        map.set_bindings(Action::SpeedUp, vec![KeyCode::Equal, KeyCode::NumpadAdd]);
        map.set_bindings(
            Action::SpeedDown,
            vec![KeyCode::Minus, KeyCode::NumpadSubtract],
        );
        map.set_bindings(Action::Quit, vec![KeyCode::KeyQ]);
        map
    }
}

impl InputMap {
    /// An empty map with nothing bound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn set_bindings(&mut self, action: Action, keys: Vec<KeyCode>) {
        self.bindings.insert(action, keys);
    }

    #[must_use]
    pub fn get_bindings(&self, action: Action) -> &[KeyCode] {
        self.bindings.get(&action).map_or(&[], Vec::as_slice)
    }
}

/// Actions that fired during one tick.
#[derive(Debug, Clone, Default)]
pub struct ActionState {
    held: HashSet<Action>,
    triggered: HashSet<Action>,
}

impl ActionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Any bound key is currently held.
    #[must_use]
    pub fn is_action_active(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// A bound key went down this tick. A press and release inside one tick
    /// still counts.
    #[must_use]
    pub fn action_just_activated(&self, action: Action) -> bool {
        self.triggered.contains(&action)
    }

    /// Actions activated this tick, in [`Action::ALL`] order.
    pub fn triggered(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL
            .into_iter()
            .filter(|action| self.triggered.contains(action))
    }
}

pub struct ActionResolver;

impl ActionResolver {
    /// Recompute `state` from the keyboard. Call once per tick, before the
    /// keyboard's transients are cleared.
    pub fn resolve(input_map: &InputMap, keyboard: &KeyboardState, state: &mut ActionState) {
        state.held.clear();
        state.triggered.clear();
        for (action, keys) in &input_map.bindings {
            if keys.iter().any(|&key| keyboard.is_pressed(key)) {
                state.held.insert(*action);
            }
            if keys.iter().any(|&key| keyboard.just_pressed(key)) {
                state.triggered.insert(*action);
            }
        }
    }
}
