//! Keybinding overrides from the config file, key names, and conflict
//! detection.
//!
//! Overrides come from `input.keybindings` as `action name -> key names`,
//! for example `"TogglePlay": "KeyP"` or `"Reset": "Escape, Backspace"`.
//! An override replaces every default key of its action. Bad entries are
//! skipped with a warning and the rest still apply.

use std::collections::HashMap;

use orrery_config::InputConfig;
use winit::keyboard::KeyCode;

use crate::action_map::{Action, InputMap};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("unknown key {key:?} for action {action}")]
    UnknownKey { action: String, key: String },
    #[error("no keys given for action {0}")]
    Empty(String),
}

/// Names match winit's `KeyCode` variants.
const KEY_NAMES: &[(&str, KeyCode)] = &[
    ("KeyA", KeyCode::KeyA),
    ("KeyB", KeyCode::KeyB),
    ("KeyC", KeyCode::KeyC),
    ("KeyD", KeyCode::KeyD),
    ("KeyE", KeyCode::KeyE),
    ("KeyF", KeyCode::KeyF),
    ("KeyG", KeyCode::KeyG),
    ("KeyH", KeyCode::KeyH),
    ("KeyI", KeyCode::KeyI),
    ("KeyJ", KeyCode::KeyJ),
    ("KeyK", KeyCode::KeyK),
    ("KeyL", KeyCode::KeyL),
    ("KeyM", KeyCode::KeyM),
    ("KeyN", KeyCode::KeyN),
    ("KeyO", KeyCode::KeyO),
    ("KeyP", KeyCode::KeyP),
    ("KeyQ", KeyCode::KeyQ),
    ("KeyR", KeyCode::KeyR),
    ("KeyS", KeyCode::KeyS),
    ("KeyT", KeyCode::KeyT),
    ("KeyU", KeyCode::KeyU),
    ("KeyV", KeyCode::KeyV),
    ("KeyW", KeyCode::KeyW),
    ("KeyX", KeyCode::KeyX),
    ("KeyY", KeyCode::KeyY),
    ("KeyZ", KeyCode::KeyZ),
    ("Digit0", KeyCode::Digit0),
    ("Digit1", KeyCode::Digit1),
    ("Digit2", KeyCode::Digit2),
    ("Digit3", KeyCode::Digit3),
    ("Digit4", KeyCode::Digit4),
    ("Digit5", KeyCode::Digit5),
    ("Digit6", KeyCode::Digit6),
    ("Digit7", KeyCode::Digit7),
    ("Digit8", KeyCode::Digit8),
    ("Digit9", KeyCode::Digit9),
    ("Numpad0", KeyCode::Numpad0),
    ("Numpad1", KeyCode::Numpad1),
    ("Numpad2", KeyCode::Numpad2),
    ("Numpad3", KeyCode::Numpad3),
    ("Numpad4", KeyCode::Numpad4),
    ("Numpad5", KeyCode::Numpad5),
    ("Numpad6", KeyCode::Numpad6),
    ("Numpad7", KeyCode::Numpad7),
    ("Numpad8", KeyCode::Numpad8),
    ("Numpad9", KeyCode::Numpad9),
    ("NumpadAdd", KeyCode::NumpadAdd),
    ("NumpadSubtract", KeyCode::NumpadSubtract),
    ("Space", KeyCode::Space),
    ("Enter", KeyCode::Enter),
    ("Escape", KeyCode::Escape),
    ("Backspace", KeyCode::Backspace),
    ("Tab", KeyCode::Tab),
    ("Equal", KeyCode::Equal),
    ("Minus", KeyCode::Minus),
    ("BracketLeft", KeyCode::BracketLeft),
    ("BracketRight", KeyCode::BracketRight),
    ("Comma", KeyCode::Comma),
    ("Period", KeyCode::Period),
    ("ArrowUp", KeyCode::ArrowUp),
    ("ArrowDown", KeyCode::ArrowDown),
    ("ArrowLeft", KeyCode::ArrowLeft),
    ("ArrowRight", KeyCode::ArrowRight),
    ("Home", KeyCode::Home),
    ("F1", KeyCode::F1),
    ("F2", KeyCode::F2),
    ("F3", KeyCode::F3),
    ("F4", KeyCode::F4),
    ("F5", KeyCode::F5),
];

/// Case-insensitive key lookup by `KeyCode` variant name.
pub fn key_from_name(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    KEY_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, code)| code)
}

pub fn key_name(code: KeyCode) -> Option<&'static str> {
    KEY_NAMES
        .iter()
        .find(|&&(_, c)| c == code)
        .map(|&(n, _)| n)
}

/// One key bound to several actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub key: KeyCode,
    /// Sorted.
    pub actions: Vec<Action>,
}

impl InputMap {
    /// Defaults with the configured overrides applied. Problems are logged,
    /// never fatal.
    #[must_use]
    pub fn from_config(config: &InputConfig) -> Self {
        let mut map = Self::default();
        for err in map.apply_overrides(&config.keybindings) {
            tracing::warn!("Ignoring keybinding override: {err}");
        }
        for conflict in map.detect_conflicts() {
            let names: Vec<String> = conflict.actions.iter().map(Action::to_string).collect();
            tracing::warn!(
                "Key {} is bound to several actions: {}",
                key_name(conflict.key).unwrap_or("?"),
                names.join(", ")
            );
        }
        map
    }

    /// Apply `action -> "Key, Key"` overrides. Valid entries apply even when
    /// others fail; the failures are returned.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> Vec<BindingError> {
        let mut errors = Vec::new();
        let mut entries: Vec<_> = overrides.iter().collect();
        entries.sort();

        for (action_name, keys) in entries {
            let action = match action_name.parse::<Action>() {
                Ok(action) => action,
                Err(err) => {
                    errors.push(err);
                    continue;
                }
            };
            match parse_keys(action_name, keys) {
                Ok(codes) => {
                    tracing::debug!(%action, keys = %keys, "Keybinding override applied");
                    self.set_bindings(action, codes);
                }
                Err(err) => errors.push(err),
            }
        }
        errors
    }

    /// Keys bound to more than one action, sorted by key name.
    #[must_use]
    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        let mut by_key: HashMap<KeyCode, Vec<Action>> = HashMap::new();
        for (action, keys) in &self.bindings {
            for key in keys {
                by_key.entry(*key).or_default().push(*action);
            }
        }
        let mut conflicts: Vec<Conflict> = by_key
            .into_iter()
            .filter(|(_, actions)| actions.len() > 1)
            .map(|(key, mut actions)| {
                actions.sort();
                Conflict { key, actions }
            })
            .collect();
        conflicts.sort_by_key(|c| key_name(c.key).unwrap_or(""));
        conflicts
    }
}

fn parse_keys(action: &str, keys: &str) -> Result<Vec<KeyCode>, BindingError> {
    let codes = keys
        .split(',')
        .filter(|k| !k.trim().is_empty())
        .map(|k| {
            key_from_name(k).ok_or_else(|| BindingError::UnknownKey {
                action: action.to_string(),
                key: k.trim().to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    if codes.is_empty() {
        return Err(BindingError::Empty(action.to_string()));
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(a, k)| (a.to_string(), k.to_string()))
            .collect()
    }

    #[test]
    fn test_key_names_resolve_both_ways() {
        assert_eq!(key_from_name("Space"), Some(KeyCode::Space));
        assert_eq!(key_from_name(" keyp "), Some(KeyCode::KeyP));
        assert_eq!(key_from_name("Hyper"), None);
        assert_eq!(key_name(KeyCode::Digit8), Some("Digit8"));
    }

    #[test]
    fn test_override_replaces_defaults() {
        let mut map = InputMap::default();
        let errors = map.apply_overrides(&overrides(&[("TogglePlay", "KeyP")]));
        assert!(errors.is_empty());
        assert_eq!(map.get_bindings(Action::TogglePlay), &[KeyCode::KeyP]);
    }

    #[test]
    fn test_override_accepts_key_list() {
        let mut map = InputMap::default();
        map.apply_overrides(&overrides(&[("Reset", "Escape, Backspace")]));
        assert_eq!(
            map.get_bindings(Action::Reset),
            &[KeyCode::Escape, KeyCode::Backspace]
        );
    }

    #[test]
    fn test_bad_entries_are_reported_and_skipped() {
        let mut map = InputMap::default();
        let errors = map.apply_overrides(&overrides(&[
            ("Jump", "Space"),
            ("Quit", "Hyper"),
            ("SpeedUp", " , "),
            ("Focus3", "KeyM"),
        ]));
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&BindingError::UnknownAction("Jump".into())));
        assert!(errors.contains(&BindingError::Empty("SpeedUp".into())));
        assert_eq!(map.get_bindings(Action::Quit), &[KeyCode::KeyQ]);
        assert_eq!(map.get_bindings(Action::Focus(3)), &[KeyCode::KeyM]);
    }

    #[test]
    fn test_defaults_have_no_conflicts() {
        assert!(InputMap::default().detect_conflicts().is_empty());
    }

    #[test]
    fn test_conflict_detected_after_override() {
        let mut map = InputMap::default();
        map.apply_overrides(&overrides(&[("Quit", "Space")]));
        let conflicts = map.detect_conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].key, KeyCode::Space);
        assert_eq!(conflicts[0].actions, vec![Action::TogglePlay, Action::Quit]);
    }

    #[test]
    fn test_from_config_applies_overrides() {
        let config = InputConfig {
            keybindings: overrides(&[("SpeedUp", "BracketRight"), ("Nope", "KeyA")]),
            ..InputConfig::default()
        };
        let map = InputMap::from_config(&config);
        assert_eq!(map.get_bindings(Action::SpeedUp), &[KeyCode::BracketRight]);
        assert_eq!(map.get_bindings(Action::TogglePlay), &[KeyCode::Space]);
    }
}
