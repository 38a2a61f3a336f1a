//! Scribe completion engine
//!
//! Inline, trigger-based word completion for rich-text editors.
//!
//! # Architecture
//!
//! An editor event flows through the engine in this order:
//!
//! 1. **Trigger detection**: scan backward from the cursor over word characters, at most
//!    `max_look_back_distance` chars, to find the partial word being typed
//! 2. **Aggregation**: ask each provider of the [`ProviderChain`] in order, stop early when a
//!    blocking provider answers, deduplicate by display name and drop rejected words
//! 3. **Popup**: show the result and let the user navigate it with the keyboard
//! 4. **Replacement**: splice the chosen suggestion in, keeping surrounding bold, italic and
//!    code markup intact, and hand snippets to a [`SnippetExpander`]
//!
//! Word providers read from an [`IndexStore`]. Index rebuilds run as tokio tasks through an
//! [`IndexRebuilder`] and publish a complete new index in one step.
//!
//! # Providers
//!
//! - [`CalloutProvider`]: callout types inside block quotes (`> [!note]`), blocking
//! - [`FileScannerProvider`]: words scanned from documents
//! - [`WordListProvider`]: words from curated word lists
//!
//! # Example
//!
//! ```
//! use scribe_completion::*;
//! use std::sync::Arc;
//!
//! let words = WordIndex::from_words(vec!["hello".to_string(), "help".to_string()]);
//! let chain = ProviderChain::with_builtin_providers(
//!     Arc::new(IndexStore::new()),
//!     Arc::new(IndexStore::with_index(words)),
//! );
//! let mut engine = SuggestionEngine::new(Settings::default(), chain, Arc::new(RejectList::new()))?;
//!
//! let mut buffer = TextBuffer::new("say hel");
//! engine.on_trigger(&buffer, Position::new(0, 7), true);
//! engine.apply_selected(&mut buffer)?;
//! assert_eq!(buffer.text(), "say help");
//! # Ok::<(), CompletionError>(())
//! ```

pub mod aggregator;
pub mod chain;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod index;
pub mod keymap;
pub mod popup;
pub mod providers;
pub mod reject;
pub mod replace;
pub mod trigger;
pub mod types;

pub use aggregator::{dedup_by_display_name, Aggregation, Aggregator};
pub use chain::ProviderChain;
pub use config::{
    KeyBindingSettings, ProviderSettings, Settings, SettingsFormat, SettingsLoader,
    WordInsertionMode,
};
pub use editor::{Editor, SnippetExpander, TextBuffer};
pub use engine::{SuggestionEngine, TriggerOutcome};
pub use error::{CompletionError, CompletionResult};
pub use index::{
    fold_diacritics, ContentIndexBuilder, DirectoryDocumentSource, Document, DocumentSource,
    IndexBuilder, IndexRebuilder, IndexStore, RebuildOutcome, StaticDocumentSource, WordIndex,
    WordListBuilder, WordMatcher,
};
pub use keymap::{Key, KeyCombo, Modifier, PopupAction, PopupKeymap};
pub use popup::{CloseReason, KeyOutcome, NavDirection, Popup, PopupState};
pub use providers::{
    CalloutProvider, CalloutType, FileScannerProvider, SuggestionProvider, WordListProvider,
};
pub use reject::RejectList;
pub use replace::{
    markup_context, normalize_replacement, ApplyOutcome, MarkupContext, ReplacementApplier,
    SnippetStatus,
};
pub use trigger::{detect_with, CharacterClass, Trigger, TriggerDetector};
pub use types::{Position, QueryContext, Span, Suggestion};
