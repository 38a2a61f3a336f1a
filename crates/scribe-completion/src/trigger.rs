//! Trigger detection: extract the in-progress word before the cursor
//!
//! The detector only asks the editor for the last `max_look_back` chars before the
//! cursor and walks them backward, so cost is bounded by the look-back distance no
//! matter how long the line is.

use crate::editor::Editor;
use crate::error::CompletionResult;
use crate::types::{Position, Span};
use regex::Regex;

/// Predicate over single chars, compiled from a regex character-class body such as
/// `a-zA-Z0-9_`
#[derive(Debug, Clone)]
pub struct CharacterClass {
    source: String,
    pattern: Regex,
}

impl CharacterClass {
    pub fn new(class: &str) -> CompletionResult<Self> {
        let pattern = Regex::new(&format!("^[{}]$", class))?;
        Ok(Self {
            source: class.to_string(),
            pattern,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.pattern.is_match(c.encode_utf8(&mut buf))
    }

    /// Split `text` into maximal runs of matching chars
    pub fn tokens<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        text.split(move |c: char| !self.matches(c))
            .filter(|token| !token.is_empty())
    }
}

/// Result of scanning backward from the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub query: String,
    /// First non-word char before the query; `None` at line start or at the look-back bound
    pub separator: Option<char>,
    /// `[cursor - query.len(), cursor)` on the cursor line
    pub span: Span,
}

/// Scans backward from the cursor using a character predicate
#[derive(Debug, Clone)]
pub struct TriggerDetector {
    class: CharacterClass,
    max_look_back: usize,
}

impl TriggerDetector {
    pub fn new(class: CharacterClass, max_look_back: usize) -> Self {
        Self {
            class,
            max_look_back,
        }
    }

    pub fn detect(&self, editor: &dyn Editor, cursor: Position) -> Trigger {
        let class = &self.class;
        detect_with(editor, cursor, self.max_look_back, |c| class.matches(c))
    }
}

/// Backward scan with an arbitrary predicate. The predicate is called at most
/// `max_look_back` times.
pub fn detect_with<F>(editor: &dyn Editor, cursor: Position, max_look_back: usize, mut is_word_char: F) -> Trigger
where
    F: FnMut(char) -> bool,
{
    let window_start = Position::new(cursor.line, cursor.ch.saturating_sub(max_look_back));
    let window = if max_look_back == 0 || cursor.ch == 0 {
        String::new()
    } else {
        editor.range_text(window_start, cursor)
    };

    let mut reversed = String::new();
    let mut separator = None;
    for (inspected, c) in window.chars().rev().enumerate() {
        if inspected >= max_look_back {
            break;
        }
        if is_word_char(c) {
            reversed.push(c);
        } else {
            separator = Some(c);
            break;
        }
    }

    let query: String = reversed.chars().rev().collect();
    let start = Position::new(cursor.line, cursor.ch - query.chars().count());
    Trigger {
        query,
        separator,
        span: Span::new(start, cursor),
    }
}
