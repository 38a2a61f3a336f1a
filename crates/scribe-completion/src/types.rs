//! Core types shared by the trigger detector, providers, popup and applier

use crate::editor::Editor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in the document. `ch` counts chars, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.ch)
    }
}

/// A half-open range `[start, end)` in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Whether the span covers nothing
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A single completion candidate.
///
/// Suggestions are immutable once built; every `with_*` method consumes the value and
/// returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Text shown in the popup, also the dedup and reject key
    pub display_name: String,
    /// Text spliced into the document
    pub replacement_text: String,
    /// Replaces the trigger span start when set
    pub override_start: Option<Position>,
    /// Replaces the trigger span end when set
    pub override_end: Option<Position>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub preview: Option<String>,
}

impl Suggestion {
    /// Create a suggestion that inserts exactly what it displays
    pub fn new(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            replacement_text: display_name.clone(),
            display_name,
            override_start: None,
            override_end: None,
            icon: None,
            color: None,
            preview: None,
        }
    }

    /// Create a suggestion whose inserted text differs from its label
    pub fn with_replacement(display_name: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::new(display_name).replacement(replacement)
    }

    pub fn replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement_text = replacement.into();
        self
    }

    pub fn with_override_start(mut self, start: Position) -> Self {
        self.override_start = Some(start);
        self
    }

    pub fn with_override_end(mut self, end: Position) -> Self {
        self.override_end = Some(end);
        self
    }

    pub fn with_override_span(self, span: Span) -> Self {
        self.with_override_start(span.start).with_override_end(span.end)
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    /// Resolve the span this suggestion replaces, given the popup's trigger span
    pub fn replacement_span(&self, trigger: Span) -> Span {
        Span::new(
            self.override_start.unwrap_or(trigger.start),
            self.override_end.unwrap_or(trigger.end),
        )
    }
}

/// Everything a provider may look at during one trigger cycle
#[derive(Clone, Copy)]
pub struct QueryContext<'a> {
    /// Token scanned backward from the cursor
    pub query: &'a str,
    /// Character that stopped the scan, `None` at line start or at the look-back bound
    pub separator: Option<char>,
    pub cursor: Position,
    /// Whether the host has a document associated with the editor
    pub has_file: bool,
    pub editor: &'a dyn Editor,
}

impl<'a> QueryContext<'a> {
    /// Text of the cursor line up to the cursor
    pub fn line_before_cursor(&self) -> String {
        self.editor
            .range_text(Position::new(self.cursor.line, 0), self.cursor)
    }

    /// Text of the whole cursor line
    pub fn line_text(&self) -> String {
        self.editor.line(self.cursor.line).unwrap_or_default()
    }
}

impl fmt::Debug for QueryContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryContext")
            .field("query", &self.query)
            .field("separator", &self.separator)
            .field("cursor", &self.cursor)
            .field("has_file", &self.has_file)
            .finish_non_exhaustive()
    }
}
