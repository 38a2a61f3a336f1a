//! Popup key bindings
//!
//! The popup owns an explicit table from key combinations to popup actions. The host
//! forwards key presses to the engine; unbound keys are left for the editor.

use crate::config::KeyBindingSettings;
use crate::error::CompletionError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Keyboard modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Ctrl,
    Shift,
    Alt,
    Meta,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Ctrl => write!(f, "Ctrl"),
            Modifier::Shift => write!(f, "Shift"),
            Modifier::Alt => write!(f, "Alt"),
            Modifier::Meta => write!(f, "Meta"),
        }
    }
}

impl FromStr for Modifier {
    type Err = CompletionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ctrl" | "control" => Ok(Modifier::Ctrl),
            "shift" => Ok(Modifier::Shift),
            "alt" | "option" => Ok(Modifier::Alt),
            "meta" | "cmd" | "command" | "mod" => Ok(Modifier::Meta),
            _ => Err(CompletionError::KeyBindingError(format!(
                "unknown modifier '{}'",
                s
            ))),
        }
    }
}

/// A key the popup can react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Up,
    Down,
    PageUp,
    PageDown,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Enter => write!(f, "Enter"),
            Key::Escape => write!(f, "Escape"),
            Key::Tab => write!(f, "Tab"),
            Key::Up => write!(f, "Up"),
            Key::Down => write!(f, "Down"),
            Key::PageUp => write!(f, "PageUp"),
            Key::PageDown => write!(f, "PageDown"),
        }
    }
}

impl FromStr for Key {
    type Err = CompletionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "enter" | "return" => Ok(Key::Enter),
            "escape" | "esc" => Ok(Key::Escape),
            "tab" => Ok(Key::Tab),
            "up" | "arrowup" => Ok(Key::Up),
            "down" | "arrowdown" => Ok(Key::Down),
            "pageup" | "page_up" => Ok(Key::PageUp),
            "pagedown" | "page_down" => Ok(Key::PageDown),
            _ => {
                let mut chars = lowered.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Key::Char(c)),
                    _ => Err(CompletionError::KeyBindingError(format!(
                        "unknown key '{}'",
                        s
                    ))),
                }
            }
        }
    }
}

/// Modifiers plus a key. Modifiers are kept sorted so equal combos hash equally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyCombo {
    pub modifiers: Vec<Modifier>,
    pub key: Key,
}

impl KeyCombo {
    pub fn new(mut modifiers: Vec<Modifier>, key: Key) -> Self {
        modifiers.sort();
        modifiers.dedup();
        let key = match key {
            Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self { modifiers, key }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(Vec::new(), key)
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(vec![Modifier::Ctrl], Key::Char(c))
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{}+", modifier)?;
        }
        write!(f, "{}", self.key)
    }
}

impl FromStr for KeyCombo {
    type Err = CompletionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(CompletionError::KeyBindingError(
                "empty key combination".to_string(),
            ));
        }
        // A trailing "+" means the plus key itself, e.g. "Ctrl++"
        let (head, key_part) = match s.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match s.rsplit_once('+') {
                Some((head, key)) => (head, key),
                None => ("", s),
            },
        };

        let mut modifiers = Vec::new();
        for part in head.split('+').filter(|p| !p.trim().is_empty()) {
            modifiers.push(Modifier::from_str(part)?);
        }
        Ok(KeyCombo::new(modifiers, Key::from_str(key_part)?))
    }
}

/// What a bound key does to the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupAction {
    SelectNext,
    SelectPrevious,
    Apply,
    Dismiss,
}

impl PopupAction {
    pub const ALL: [PopupAction; 4] = [
        PopupAction::SelectNext,
        PopupAction::SelectPrevious,
        PopupAction::Apply,
        PopupAction::Dismiss,
    ];

    /// Built-in keys for this action when settings leave it unset
    pub fn default_keys(self) -> Vec<KeyCombo> {
        match self {
            PopupAction::SelectNext => vec![KeyCombo::plain(Key::Down), KeyCombo::ctrl('n')],
            PopupAction::SelectPrevious => vec![KeyCombo::plain(Key::Up), KeyCombo::ctrl('p')],
            PopupAction::Apply => vec![KeyCombo::plain(Key::Enter), KeyCombo::plain(Key::Tab)],
            PopupAction::Dismiss => vec![KeyCombo::plain(Key::Escape)],
        }
    }
}

/// Lookup table from key combination to popup action
#[derive(Debug, Clone)]
pub struct PopupKeymap {
    bindings: HashMap<KeyCombo, PopupAction>,
}

impl PopupKeymap {
    /// An empty table
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Built-in bindings, applied over by [`KeyBindingSettings`]
    pub fn from_settings(settings: &KeyBindingSettings) -> Result<Self, CompletionError> {
        let mut keymap = Self::empty();
        for action in PopupAction::ALL {
            let overrides = match action {
                PopupAction::SelectNext => &settings.select_next,
                PopupAction::SelectPrevious => &settings.select_previous,
                PopupAction::Apply => &settings.apply,
                PopupAction::Dismiss => &settings.dismiss,
            };
            let combos = match overrides {
                Some(specs) => specs
                    .iter()
                    .map(|spec| KeyCombo::from_str(spec))
                    .collect::<Result<Vec<_>, _>>()?,
                None => action.default_keys(),
            };
            for combo in combos {
                keymap.bind(combo, action)?;
            }
        }

        Ok(keymap)
    }

    /// Bind a combination. Binding one combination to two actions is an error.
    pub fn bind(&mut self, combo: KeyCombo, action: PopupAction) -> Result<(), CompletionError> {
        if let Some(existing) = self.bindings.get(&combo) {
            if *existing != action {
                return Err(CompletionError::KeyBindingError(format!(
                    "{} is bound to both {:?} and {:?}",
                    combo, existing, action
                )));
            }
        }
        self.bindings.insert(combo, action);
        Ok(())
    }

    pub fn lookup(&self, combo: &KeyCombo) -> Option<PopupAction> {
        self.bindings.get(combo).copied()
    }

    /// All combinations bound to `action`, sorted by their display form
    pub fn keys_for(&self, action: PopupAction) -> Vec<&KeyCombo> {
        let mut keys: Vec<&KeyCombo> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k)
            .collect();
        keys.sort_by_key(|k| k.to_string());
        keys
    }
}

impl Default for PopupKeymap {
    fn default() -> Self {
        let mut keymap = Self::empty();
        for action in PopupAction::ALL {
            for combo in action.default_keys() {
                keymap.bindings.insert(combo, action);
            }
        }
        keymap
    }
}
