//! Host editor and snippet collaborator interfaces
//!
//! The engine only talks to the editing surface through [`Editor`]. [`TextBuffer`] is a
//! plain in-memory implementation used by the CLI and the tests.

use crate::error::CompletionResult;
use crate::types::Position;

/// Primitives the engine needs from the editing surface. Columns are char offsets.
pub trait Editor {
    /// Text of a line without its terminator, `None` past the end of the document
    fn line(&self, line: usize) -> Option<String>;

    fn line_count(&self) -> usize;

    /// Text between two positions; columns past the line end are clamped
    fn range_text(&self, from: Position, to: Position) -> String;

    /// Replace `[from, to)` with `text`
    fn replace_range(&mut self, text: &str, from: Position, to: Position);

    fn cursor(&self) -> Position;

    fn set_cursor(&mut self, position: Position);

    /// Whether the current editing mode can run snippet placeholder navigation
    fn supports_snippets(&self) -> bool {
        true
    }

    /// Length of a line in chars, 0 past the end of the document
    fn line_len(&self, line: usize) -> usize {
        self.line(line).map(|l| l.chars().count()).unwrap_or(0)
    }
}

/// Receives inserted text containing placeholder markers and takes over cursor handling
pub trait SnippetExpander: Send + Sync {
    fn expand(&self, inserted: &str, start: Position, editor: &mut dyn Editor) -> CompletionResult<()>;
}

/// Byte offset of the `ch`-th char of `text`, clamped to the end
pub(crate) fn byte_offset(text: &str, ch: usize) -> usize {
    text.char_indices()
        .nth(ch)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// In-memory line buffer
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    lines: Vec<String>,
    cursor: Position,
    snippets_supported: bool,
}

impl TextBuffer {
    pub fn new(text: &str) -> Self {
        let lines = text.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect();
        Self {
            lines,
            cursor: Position::default(),
            snippets_supported: true,
        }
    }

    pub fn with_cursor(mut self, cursor: Position) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_snippet_support(mut self, supported: bool) -> Self {
        self.snippets_supported = supported;
        self
    }

    /// Whole buffer joined with `\n`
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn clamp(&self, position: Position) -> Position {
        if self.lines.is_empty() {
            return Position::default();
        }
        let line = position.line.min(self.lines.len() - 1);
        let ch = position.ch.min(self.line_len(line));
        Position::new(line, ch)
    }
}

impl Editor for TextBuffer {
    fn line(&self, line: usize) -> Option<String> {
        self.lines.get(line).cloned()
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn range_text(&self, from: Position, to: Position) -> String {
        let from = self.clamp(from);
        let to = self.clamp(to);
        if from >= to {
            return String::new();
        }

        if from.line == to.line {
            let line = &self.lines[from.line];
            return line[byte_offset(line, from.ch)..byte_offset(line, to.ch)].to_string();
        }

        let mut out = String::new();
        let first = &self.lines[from.line];
        out.push_str(&first[byte_offset(first, from.ch)..]);
        for line in &self.lines[from.line + 1..to.line] {
            out.push('\n');
            out.push_str(line);
        }
        let last = &self.lines[to.line];
        out.push('\n');
        out.push_str(&last[..byte_offset(last, to.ch)]);
        out
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        let from = self.clamp(from);
        let to = self.clamp(to).max(from);

        let head = &self.lines[from.line];
        let tail = &self.lines[to.line];
        let joined = format!(
            "{}{}{}",
            &head[..byte_offset(head, from.ch)],
            text,
            &tail[byte_offset(tail, to.ch)..]
        );

        let replacement: Vec<String> = joined.split('\n').map(str::to_string).collect();
        self.lines.splice(from.line..=to.line, replacement);
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn set_cursor(&mut self, position: Position) {
        self.cursor = self.clamp(position);
    }

    fn supports_snippets(&self) -> bool {
        self.snippets_supported
    }
}
