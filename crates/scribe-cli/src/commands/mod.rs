// Command handlers for the scribe CLI

pub mod complete;
pub mod scan;
pub mod suggest;

pub use complete::CompleteCommand;
pub use scan::ScanCommand;
pub use suggest::SuggestCommand;

use crate::error::{CliError, CliResult};
use scribe_completion::{Editor, Position, TextBuffer};

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}

/// Check that `line`/`ch` address a real position in the buffer
pub(crate) fn checked_cursor(buffer: &TextBuffer, line: usize, ch: usize) -> CliResult<Position> {
    let Some(text) = buffer.line(line) else {
        return Err(CliError::invalid_argument(format!(
            "line {} is past the end of the document ({} lines)",
            line,
            buffer.line_count()
        )));
    };
    let len = text.chars().count();
    if ch > len {
        return Err(CliError::invalid_argument(format!(
            "column {} is past the end of line {} ({} chars)",
            ch, line, len
        )));
    }
    Ok(Position::new(line, ch))
}
