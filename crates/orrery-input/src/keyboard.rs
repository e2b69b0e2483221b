//! Frame-coherent keyboard state.
//!
//! [`KeyboardState`] collects winit key events between ticks and answers,
//! per physical key, whether it is held and whether it went down or up since
//! the last [`clear_transients`](KeyboardState::clear_transients). Physical
//! codes keep the digit hotkeys and `=`/`-` in the same place on every layout.

use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// The parts of a key event the tracker needs.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    pub key: PhysicalKey,
    pub state: ElementState,
    /// OS auto-repeat.
    pub repeat: bool,
}

impl RawKeyEvent {
    pub fn pressed(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    pub fn released(code: KeyCode) -> Self {
        Self {
            key: PhysicalKey::Code(code),
            state: ElementState::Released,
            repeat: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<KeyCode>,
    just_pressed: HashSet<KeyCode>,
    just_released: HashSet<KeyCode>,
}

impl KeyboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &KeyEvent) {
        self.process_raw(RawKeyEvent {
            key: event.physical_key,
            state: event.state,
            repeat: event.repeat,
        });
    }

    /// Auto-repeat is dropped so holding Space toggles play once. Keys
    /// without a known physical code are ignored.
    pub fn process_raw(&mut self, event: RawKeyEvent) {
        if event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.key else {
            return;
        };
        match event.state {
            ElementState::Pressed => {
                if self.held.insert(code) {
                    self.just_pressed.insert(code);
                }
            }
            ElementState::Released => {
                if self.held.remove(&code) {
                    self.just_released.insert(code);
                }
            }
        }
    }

    #[must_use]
    pub fn is_pressed(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    #[must_use]
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed.contains(&key)
    }

    #[must_use]
    pub fn just_released(&self, key: KeyCode) -> bool {
        self.just_released.contains(&key)
    }

    /// Release everything, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn release_all(&mut self) {
        self.just_released.extend(self.held.drain());
        self.just_pressed.clear();
    }

    /// Forget edges. Call once per processed tick.
    pub fn clear_transients(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_sets_held_and_edge() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::Space));
        assert!(kb.is_pressed(KeyCode::Space));
        assert!(kb.just_pressed(KeyCode::Space));
        assert!(!kb.just_released(KeyCode::Space));
    }

    #[test]
    fn test_edge_lasts_one_frame() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::Digit3));
        kb.clear_transients();
        assert!(!kb.just_pressed(KeyCode::Digit3));
        assert!(kb.is_pressed(KeyCode::Digit3));

        kb.process_raw(RawKeyEvent::released(KeyCode::Digit3));
        assert!(kb.just_released(KeyCode::Digit3));
        kb.clear_transients();
        assert!(!kb.just_released(KeyCode::Digit3));
        assert!(!kb.is_pressed(KeyCode::Digit3));
    }

    #[test]
    fn test_auto_repeat_does_not_retrigger() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::Space));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent {
            repeat: true,
            ..RawKeyEvent::pressed(KeyCode::Space)
        });
        assert!(!kb.just_pressed(KeyCode::Space));
    }

    #[test]
    fn test_duplicate_press_without_release_is_not_an_edge() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::Equal));
        kb.clear_transients();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::Equal));
        assert!(!kb.just_pressed(KeyCode::Equal));
    }

    #[test]
    fn test_release_of_unheld_key_is_ignored() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::released(KeyCode::KeyR));
        assert!(!kb.just_released(KeyCode::KeyR));
    }

    #[test]
    fn test_release_all_on_focus_loss() {
        let mut kb = KeyboardState::new();
        kb.process_raw(RawKeyEvent::pressed(KeyCode::Minus));
        kb.process_raw(RawKeyEvent::pressed(KeyCode::KeyQ));
        kb.release_all();
        assert!(!kb.is_pressed(KeyCode::Minus));
        assert!(kb.just_released(KeyCode::KeyQ));
        assert!(!kb.just_pressed(KeyCode::KeyQ));
    }
}
