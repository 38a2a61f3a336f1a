//! Callout type completion inside block quotes, e.g. `> [!war` → `> [!warning] `
use super::SuggestionProvider;
use crate::config::Settings;
use crate::error::CompletionResult;
use crate::types::{Position, QueryContext, Suggestion};
use tracing::debug;

/// A callout kind with its alternative spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalloutType {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub icon: &'static str,
    pub color: &'static str,
}

const CALLOUT_TYPES: &[CalloutType] = &[
    CalloutType { name: "note", aliases: &[], icon: "pencil", color: "blue" },
    CalloutType { name: "abstract", aliases: &["summary", "tldr"], icon: "clipboard-list", color: "cyan" },
    CalloutType { name: "info", aliases: &[], icon: "info", color: "blue" },
    CalloutType { name: "todo", aliases: &[], icon: "check-circle", color: "blue" },
    CalloutType { name: "tip", aliases: &["hint", "important"], icon: "flame", color: "cyan" },
    CalloutType { name: "success", aliases: &["check", "done"], icon: "check", color: "green" },
    CalloutType { name: "question", aliases: &["help", "faq"], icon: "help-circle", color: "yellow" },
    CalloutType { name: "warning", aliases: &["caution", "attention"], icon: "alert-triangle", color: "orange" },
    CalloutType { name: "failure", aliases: &["fail", "missing"], icon: "x", color: "red" },
    CalloutType { name: "danger", aliases: &["error"], icon: "zap", color: "red" },
    CalloutType { name: "bug", aliases: &[], icon: "bug", color: "red" },
    CalloutType { name: "example", aliases: &[], icon: "list", color: "purple" },
    CalloutType { name: "quote", aliases: &["cite"], icon: "quote", color: "gray" },
];

/// Suggests callout types after `[!` on a block-quote line.
///
/// Blocks every later provider while it has answers, and overrides the replacement span
/// so the whole `[!partial` (plus an existing `]`) is rewritten.
#[derive(Debug, Clone)]
pub struct CalloutProvider {
    types: Vec<CalloutType>,
}

impl Default for CalloutProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CalloutProvider {
    pub fn new() -> Self {
        Self {
            types: CALLOUT_TYPES.to_vec(),
        }
    }

    pub fn with_types(types: Vec<CalloutType>) -> Self {
        Self { types }
    }

    pub fn types(&self) -> &[CalloutType] {
        &self.types
    }
}

fn is_callout_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Char column of the `[` opening a callout header, and the partial typed after `[!`
fn callout_opening(before: &str) -> Option<(usize, String)> {
    let quoted = before.trim_start();
    if !quoted.starts_with('>') {
        return None;
    }
    let bracket = before.rfind("[!")?;
    let partial = &before[bracket + 2..];
    if !partial.chars().all(is_callout_char) {
        return None;
    }
    // everything between the quote markers and the bracket must be more quote markers
    let prefix = &before[..bracket];
    if !prefix.chars().all(|c| c == '>' || c.is_whitespace()) {
        return None;
    }
    Some((prefix.chars().count(), partial.to_string()))
}

impl SuggestionProvider for CalloutProvider {
    fn name(&self) -> &str {
        "callout"
    }

    fn suggestions(&self, context: &QueryContext<'_>, settings: &Settings) -> CompletionResult<Vec<Suggestion>> {
        if !settings.providers.callout_enabled {
            return Ok(Vec::new());
        }
        let before = context.line_before_cursor();
        let Some((bracket_ch, partial)) = callout_opening(&before) else {
            return Ok(Vec::new());
        };

        let line = context.line_text();
        let tail_len = line
            .chars()
            .skip(context.cursor.ch)
            .take_while(|c| is_callout_char(*c))
            .count();
        let closed = line.chars().nth(context.cursor.ch + tail_len) == Some(']');

        let start = Position::new(context.cursor.line, bracket_ch);
        let end = if closed {
            Position::new(context.cursor.line, context.cursor.ch + tail_len + 1)
        } else {
            context.cursor
        };

        let wanted = partial.to_lowercase();
        let mut suggestions = Vec::new();
        for kind in &self.types {
            let names = std::iter::once(kind.name).chain(kind.aliases.iter().copied());
            for name in names.filter(|n| n.starts_with(&wanted)) {
                let replacement = if closed {
                    format!("[!{}]", name)
                } else {
                    format!("[!{}] ", name)
                };
                suggestions.push(
                    Suggestion::with_replacement(name, replacement)
                        .with_override_start(start)
                        .with_override_end(end)
                        .with_icon(kind.icon)
                        .with_color(kind.color),
                );
            }
        }
        debug!("Callout partial {:?} matched {} types", partial, suggestions.len());
        Ok(suggestions)
    }

    fn blocks_all_other_providers(&self) -> bool {
        true
    }
}
