//! Splicing a chosen suggestion into the document
//!
//! The replacement is adjusted to the markup surrounding the replaced span: when the span
//! sits inside bold, italic or inline code, that delimiter is stripped from the inserted
//! text so the emphasis is not closed and reopened.

use crate::config::Settings;
use crate::editor::{Editor, SnippetExpander};
use crate::error::CompletionResult;
use crate::types::{Position, Span, Suggestion};
use std::sync::Arc;
use tracing::{debug, warn};

/// Which markup spans enclose a position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkupContext {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
}

#[derive(Debug, Default, Clone, Copy)]
struct DelimiterCounts {
    bold: usize,
    italic: usize,
    code: usize,
}

fn count_delimiters(text: &str) -> DelimiterCounts {
    let mut counts = DelimiterCounts::default();
    let mut stars = 0;
    let flush = |stars: &mut usize, counts: &mut DelimiterCounts| {
        counts.bold += *stars / 2;
        counts.italic += *stars % 2;
        *stars = 0;
    };
    for c in text.chars() {
        if c == '*' {
            stars += 1;
            continue;
        }
        flush(&mut stars, &mut counts);
        match c {
            '_' => counts.italic += 1,
            '`' => counts.code += 1,
            _ => {}
        }
    }
    flush(&mut stars, &mut counts);
    counts
}

/// A delimiter encloses the span when its count is odd on both sides
pub fn markup_context(before: &str, after: &str) -> MarkupContext {
    let b = count_delimiters(before);
    let a = count_delimiters(after);
    let odd = |n: usize| n % 2 == 1;
    MarkupContext {
        bold: odd(b.bold) && odd(a.bold),
        italic: odd(b.italic) && odd(a.italic),
        code: odd(b.code) && odd(a.code),
    }
}

/// Remove the delimiters of every markup type that already encloses the insertion point
pub fn normalize_replacement(replacement: &str, context: MarkupContext) -> String {
    let mut out = String::with_capacity(replacement.len());
    let mut stars = 0;
    let flush = |stars: &mut usize, out: &mut String| {
        let pairs = if context.bold { 0 } else { *stars / 2 };
        let lone = if context.italic { 0 } else { *stars % 2 };
        out.extend(std::iter::repeat('*').take(pairs * 2 + lone));
        *stars = 0;
    };
    for c in replacement.chars() {
        if c == '*' {
            stars += 1;
            continue;
        }
        flush(&mut stars, &mut out);
        match c {
            '_' if context.italic => {}
            '`' if context.code => {}
            _ => out.push(c),
        }
    }
    flush(&mut stars, &mut out);
    out
}

/// Position right after `text` inserted at `start`
pub fn end_of_insertion(start: Position, text: &str) -> Position {
    match text.rsplit_once('\n') {
        Some((head, last)) => Position::new(
            start.line + head.matches('\n').count() + 1,
            last.chars().count(),
        ),
        None => Position::new(start.line, start.ch + text.chars().count()),
    }
}

/// How snippet markers in the inserted text were handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetStatus {
    /// No markers; the cursor was placed after the text
    NotSnippet,
    /// Handed to the expander
    Expanded,
    /// Markers present but the editor or host cannot expand them
    Unsupported,
    /// The expander returned an error; the edit stays
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Text actually spliced in
    pub inserted: String,
    /// Span it replaced
    pub replaced: Span,
    /// Cursor after applying
    pub cursor: Position,
    pub snippet: SnippetStatus,
}

/// Applies suggestions to an [`Editor`]
#[derive(Clone, Default)]
pub struct ReplacementApplier {
    snippet_expander: Option<Arc<dyn SnippetExpander>>,
}

impl ReplacementApplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snippet_expander(mut self, expander: Arc<dyn SnippetExpander>) -> Self {
        self.snippet_expander = Some(expander);
        self
    }

    pub fn has_snippet_expander(&self) -> bool {
        self.snippet_expander.is_some()
    }

    pub fn apply(
        &self,
        editor: &mut dyn Editor,
        suggestion: &Suggestion,
        trigger: Span,
        settings: &Settings,
    ) -> CompletionResult<ApplyOutcome> {
        let span = suggestion.replacement_span(trigger);
        let start = span.start;
        let end = Position::new(span.end.line, span.end.ch.min(editor.line_len(span.end.line)));

        let before = editor.range_text(Position::new(start.line, 0), start);
        let after = editor.range_text(end, Position::new(end.line, editor.line_len(end.line)));
        let context = markup_context(&before, &after);
        let mut text = normalize_replacement(&suggestion.replacement_text, context);

        let is_snippet = text.chars().any(|c| settings.is_snippet_marker(c));
        if !is_snippet && settings.insert_space_after_complete {
            text.push(' ');
        }

        editor.replace_range(&text, start, end);
        let after_text = end_of_insertion(start, &text);
        debug!(
            "Replaced {}..{} with {:?} (markup {:?})",
            start, end, text, context
        );

        let snippet = if !is_snippet {
            editor.set_cursor(after_text);
            SnippetStatus::NotSnippet
        } else {
            match &self.snippet_expander {
                Some(expander) if editor.supports_snippets() => {
                    match expander.expand(&text, start, editor) {
                        Ok(()) => SnippetStatus::Expanded,
                        Err(e) => {
                            warn!("Snippet expansion of {:?} failed: {}", text, e);
                            SnippetStatus::Failed
                        }
                    }
                }
                _ => {
                    warn!(
                        "Inserted {:?} contains snippet markers but snippets are unavailable here",
                        text
                    );
                    editor.set_cursor(after_text);
                    SnippetStatus::Unsupported
                }
            }
        };

        Ok(ApplyOutcome {
            inserted: text,
            replaced: Span::new(start, end),
            cursor: editor.cursor(),
            snippet,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextBuffer;
    use crate::error::CompletionError;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<(String, Position)>>,
        fail: bool,
    }

    impl SnippetExpander for Recorder {
        fn expand(&self, inserted: &str, start: Position, editor: &mut dyn Editor) -> CompletionResult<()> {
            self.calls.lock().push((inserted.to_string(), start));
            if self.fail {
                return Err(CompletionError::snippet_error("no placeholders"));
            }
            editor.set_cursor(start);
            Ok(())
        }
    }

    fn span(line: usize, from: usize, to: usize) -> Span {
        Span::new(Position::new(line, from), Position::new(line, to))
    }

    #[test]
    fn test_markup_context_counts_parity() {
        assert_eq!(
            markup_context("**hello ", " world**"),
            MarkupContext { bold: true, italic: false, code: false }
        );
        assert!(markup_context("*a ", " b*").italic);
        assert!(markup_context("_a ", " b_").italic);
        assert!(markup_context("`x ", "`").code);
        assert_eq!(markup_context("***a ", " b***"), MarkupContext { bold: true, italic: true, code: false });
        assert_eq!(markup_context("**a** ", " **b**"), MarkupContext::default());
    }

    #[test]
    fn test_normalize_strips_only_enclosing_markup() {
        let bold = MarkupContext { bold: true, ..MarkupContext::default() };
        assert_eq!(normalize_replacement("foo", bold), "foo");
        assert_eq!(normalize_replacement("**foo**", bold), "foo");
        assert_eq!(normalize_replacement("*foo*", bold), "*foo*");

        let code = MarkupContext { code: true, ..MarkupContext::default() };
        assert_eq!(normalize_replacement("`a_b`", code), "a_b");
        assert_eq!(normalize_replacement("**x**", MarkupContext::default()), "**x**");
    }

    #[test]
    fn test_apply_plain_word() {
        let mut buffer = TextBuffer::new("he wor there").with_cursor(Position::new(0, 6));
        let outcome = ReplacementApplier::new()
            .apply(&mut buffer, &Suggestion::new("hello"), span(0, 3, 6), &Settings::default())
            .unwrap();

        assert_eq!(buffer.text(), "he hello there");
        assert_eq!(outcome.cursor, Position::new(0, 8));
        assert_eq!(outcome.snippet, SnippetStatus::NotSnippet);
    }

    #[test]
    fn test_apply_inside_bold_strips_delimiters() {
        let mut buffer = TextBuffer::new("**hello fo world**");
        ReplacementApplier::new()
            .apply(&mut buffer, &Suggestion::new("**foo**"), span(0, 8, 10), &Settings::default())
            .unwrap();
        assert_eq!(buffer.text(), "**hello foo world**");
    }

    #[test]
    fn test_apply_clamps_override_end() {
        let mut buffer = TextBuffer::new("> [!wa");
        let suggestion = Suggestion::with_replacement("warning", "[!warning]")
            .with_override_span(span(0, 2, 40));
        let outcome = ReplacementApplier::new()
            .apply(&mut buffer, &suggestion, span(0, 4, 6), &Settings::default())
            .unwrap();
        assert_eq!(buffer.text(), "> [!warning]");
        assert_eq!(outcome.replaced, span(0, 2, 6));
    }

    #[test]
    fn test_insert_space_after() {
        let mut buffer = TextBuffer::new("wor");
        let settings = Settings {
            insert_space_after_complete: true,
            ..Settings::default()
        };
        let outcome = ReplacementApplier::new()
            .apply(&mut buffer, &Suggestion::new("world"), span(0, 0, 3), &settings)
            .unwrap();
        assert_eq!(buffer.text(), "world ");
        assert_eq!(outcome.cursor, Position::new(0, 6));
    }

    #[test]
    fn test_snippet_is_handed_off() {
        let recorder = Arc::new(Recorder::default());
        let applier = ReplacementApplier::new().with_snippet_expander(recorder.clone());
        let mut buffer = TextBuffer::new("x fn");
        let outcome = applier
            .apply(&mut buffer, &Suggestion::new("fn #name#()"), span(0, 2, 4), &Settings::default())
            .unwrap();

        assert_eq!(outcome.snippet, SnippetStatus::Expanded);
        assert_eq!(buffer.text(), "x fn #name#()");
        assert_eq!(*recorder.calls.lock(), vec![("fn #name#()".to_string(), Position::new(0, 2))]);
    }

    #[test]
    fn test_snippet_without_editor_support() {
        let recorder = Arc::new(Recorder::default());
        let applier = ReplacementApplier::new().with_snippet_expander(recorder.clone());
        let mut buffer = TextBuffer::new("fn").with_snippet_support(false);
        let outcome = applier
            .apply(&mut buffer, &Suggestion::new("fn ~x~"), span(0, 0, 2), &Settings::default())
            .unwrap();

        assert_eq!(outcome.snippet, SnippetStatus::Unsupported);
        assert_eq!(outcome.cursor, Position::new(0, 6));
        assert!(recorder.calls.lock().is_empty());
    }

    #[test]
    fn test_failed_expansion_keeps_edit() {
        let recorder = Arc::new(Recorder { fail: true, ..Recorder::default() });
        let applier = ReplacementApplier::new().with_snippet_expander(recorder);
        let mut buffer = TextBuffer::new("fn");
        let outcome = applier
            .apply(&mut buffer, &Suggestion::new("fn #a#"), span(0, 0, 2), &Settings::default())
            .unwrap();

        assert_eq!(outcome.snippet, SnippetStatus::Failed);
        assert_eq!(buffer.text(), "fn #a#");
    }

    #[test]
    fn test_multiline_insertion_cursor() {
        let mut buffer = TextBuffer::new("ab");
        let outcome = ReplacementApplier::new()
            .apply(&mut buffer, &Suggestion::new("one\ntwo"), span(0, 0, 2), &Settings::default())
            .unwrap();
        assert_eq!(buffer.text(), "one\ntwo");
        assert_eq!(outcome.cursor, Position::new(1, 3));
    }
}
