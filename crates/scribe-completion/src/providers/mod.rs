//! Suggestion sources
//!
//! Every source implements [`SuggestionProvider`]. Sources are queried synchronously on
//! the editor event path, so they only read in-memory state.
//!
//! Built-in sources, in their default chain order:
//!
//! 1. [`CalloutProvider`]: structural completion of callout types (`> [!note]`). Blocking.
//! 2. [`FileScannerProvider`]: words scanned from documents.
//! 3. [`WordListProvider`]: words from curated word lists.

mod callout;
mod words;

pub use callout::{CalloutProvider, CalloutType};
pub use words::{FileScannerProvider, WordListProvider};

use crate::config::Settings;
use crate::error::CompletionResult;
use crate::types::{QueryContext, Suggestion};

/// A unit that turns a query into suggestions
pub trait SuggestionProvider: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    fn suggestions(&self, context: &QueryContext<'_>, settings: &Settings) -> CompletionResult<Vec<Suggestion>>;

    /// When `true` and this source returns anything, later sources are skipped
    fn blocks_all_other_providers(&self) -> bool {
        false
    }
}
