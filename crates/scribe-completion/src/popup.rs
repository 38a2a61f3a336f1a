//! Popup selection state machine
//!
//! ```text
//! Closed ──open──▶ OpenUnfocused ──navigate──▶ OpenFocused(i) ──navigate──▶ OpenFocused(i±1 mod n)
//!    ▲                  │                           │
//!    └──── apply / dismiss / invalidate ────────────┘
//! ```
//!
//! Apply and dismissal arm the `just_closed` guard so the edit they cause does not reopen
//! the popup; invalidation does not.

use crate::keymap::{KeyCombo, PopupAction, PopupKeymap};
use crate::types::{Position, Span, Suggestion};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState {
    Closed,
    OpenUnfocused,
    OpenFocused(usize),
}

/// Direction of a selection move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Next,
    Previous,
    None,
}

impl NavDirection {
    pub fn delta(self) -> isize {
        match self {
            NavDirection::Next => 1,
            NavDirection::Previous => -1,
            NavDirection::None => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// A suggestion was spliced in
    Applied,
    /// The user closed the popup
    Dismissed,
    /// The trigger context no longer holds
    Invalidated,
}

impl CloseReason {
    fn arms_guard(self) -> bool {
        !matches!(self, CloseReason::Invalidated)
    }
}

/// What the popup made of a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not for the popup; the editor should handle it
    PassThrough,
    /// The selection moved
    Navigated,
    /// The caller should apply the selected suggestion
    Apply,
    /// The caller should dismiss the popup
    Dismiss,
}

#[derive(Debug, Clone)]
pub struct Popup {
    state: PopupState,
    suggestions: Arc<[Suggestion]>,
    span: Span,
    just_closed: bool,
    keymap: PopupKeymap,
}

impl Default for Popup {
    fn default() -> Self {
        Self::new(PopupKeymap::default())
    }
}

impl Popup {
    pub fn new(keymap: PopupKeymap) -> Self {
        Self {
            state: PopupState::Closed,
            suggestions: Arc::from(Vec::new()),
            span: Span::default(),
            just_closed: false,
            keymap,
        }
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PopupState::Closed
    }

    pub fn suggestions(&self) -> &Arc<[Suggestion]> {
        &self.suggestions
    }

    /// Span the selected suggestion replaces unless it overrides it
    pub fn trigger_span(&self) -> Span {
        self.span
    }

    pub fn keymap(&self) -> &PopupKeymap {
        &self.keymap
    }

    pub fn selected_index(&self) -> Option<usize> {
        match self.state {
            PopupState::OpenFocused(i) => Some(i),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&Suggestion> {
        self.selected_index().and_then(|i| self.suggestions.get(i))
    }

    /// Show a fresh list. An empty list closes the popup instead.
    pub fn open(&mut self, suggestions: Vec<Suggestion>, span: Span, auto_focus: bool) {
        if suggestions.is_empty() {
            self.close(CloseReason::Invalidated);
            return;
        }
        self.suggestions = Arc::from(suggestions);
        self.span = span;
        self.state = if auto_focus {
            PopupState::OpenFocused(0)
        } else {
            PopupState::OpenUnfocused
        };
        debug!("Popup open with {} suggestions at {}", self.suggestions.len(), span.start);
    }

    /// Move the selection with wrap-around. Returns `false` while closed.
    pub fn navigate(&mut self, direction: NavDirection) -> bool {
        let len = self.suggestions.len();
        self.state = match self.state {
            PopupState::Closed => return false,
            PopupState::OpenUnfocused => match direction {
                NavDirection::Previous => PopupState::OpenFocused(len - 1),
                NavDirection::Next | NavDirection::None => PopupState::OpenFocused(0),
            },
            PopupState::OpenFocused(i) => {
                let next = (i as isize + direction.delta()).rem_euclid(len as isize);
                PopupState::OpenFocused(next as usize)
            }
        };
        true
    }

    pub fn close(&mut self, reason: CloseReason) {
        if self.state == PopupState::Closed {
            return;
        }
        self.state = PopupState::Closed;
        self.suggestions = Arc::from(Vec::new());
        if reason.arms_guard() {
            self.just_closed = true;
        }
        debug!("Popup closed: {:?}", reason);
    }

    /// Read and clear the just-closed guard
    pub fn take_just_closed(&mut self) -> bool {
        std::mem::take(&mut self.just_closed)
    }

    pub fn is_just_closed(&self) -> bool {
        self.just_closed
    }

    /// Whether a cursor at `cursor` ends the current cycle
    pub fn invalidated_by(&self, cursor: Position) -> bool {
        self.is_open() && (cursor.line != self.span.end.line || cursor < self.span.start)
    }

    /// Drop the selected suggestion from the list, closing the popup when nothing is left
    pub fn remove_selected(&mut self) -> Option<Suggestion> {
        let index = self.selected_index()?;
        let removed = self.suggestions.get(index)?.clone();
        let remaining: Vec<Suggestion> = self
            .suggestions
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, s)| s.clone())
            .collect();

        if remaining.is_empty() {
            self.close(CloseReason::Invalidated);
        } else {
            self.state = PopupState::OpenFocused(index.min(remaining.len() - 1));
            self.suggestions = Arc::from(remaining);
        }
        Some(removed)
    }

    /// Route a key press through the keymap
    pub fn handle_key(&mut self, combo: &KeyCombo) -> KeyOutcome {
        if !self.is_open() {
            return KeyOutcome::PassThrough;
        }
        match self.keymap.lookup(combo) {
            Some(PopupAction::SelectNext) => {
                self.navigate(NavDirection::Next);
                KeyOutcome::Navigated
            }
            Some(PopupAction::SelectPrevious) => {
                self.navigate(NavDirection::Previous);
                KeyOutcome::Navigated
            }
            Some(PopupAction::Apply) if self.selected().is_some() => KeyOutcome::Apply,
            Some(PopupAction::Apply) | None => KeyOutcome::PassThrough,
            Some(PopupAction::Dismiss) => KeyOutcome::Dismiss,
        }
    }
}
