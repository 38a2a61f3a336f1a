//! Word providers backed by an [`IndexStore`]
use super::SuggestionProvider;
use crate::config::Settings;
use crate::error::CompletionResult;
use crate::index::{IndexStore, WordMatcher};
use crate::types::{QueryContext, Suggestion};
use std::sync::Arc;

fn word_suggestions(store: &IndexStore, context: &QueryContext<'_>, settings: &Settings) -> Vec<Suggestion> {
    if context.query.chars().count() < settings.min_word_trigger_length.max(1) {
        return Vec::new();
    }
    let index = store.snapshot();
    WordMatcher::from_settings(settings).suggestions(&index, context.query)
}

/// Suggests words scanned from document contents
pub struct FileScannerProvider {
    store: Arc<IndexStore>,
}

impl FileScannerProvider {
    pub fn new(store: Arc<IndexStore>) -> Self {
        Self { store }
    }
}

impl SuggestionProvider for FileScannerProvider {
    fn name(&self) -> &str {
        "file-scanner"
    }

    fn suggestions(&self, context: &QueryContext<'_>, settings: &Settings) -> CompletionResult<Vec<Suggestion>> {
        if !settings.providers.file_scanner_enabled {
            return Ok(Vec::new());
        }
        Ok(word_suggestions(&self.store, context, settings))
    }
}

/// Suggests words from curated word lists
pub struct WordListProvider {
    store: Arc<IndexStore>,
}

impl WordListProvider {
    pub fn new(store: Arc<IndexStore>) -> Self {
        Self { store }
    }
}

impl SuggestionProvider for WordListProvider {
    fn name(&self) -> &str {
        "word-list"
    }

    fn suggestions(&self, context: &QueryContext<'_>, settings: &Settings) -> CompletionResult<Vec<Suggestion>> {
        if !settings.providers.word_list_enabled {
            return Ok(Vec::new());
        }
        Ok(word_suggestions(&self.store, context, settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextBuffer;
    use crate::index::WordIndex;
    use crate::types::Position;

    fn store(words: &[&str]) -> Arc<IndexStore> {
        Arc::new(IndexStore::with_index(WordIndex::from_words(
            words.iter().map(|w| w.to_string()),
        )))
    }

    fn names(suggestions: Vec<Suggestion>) -> Vec<String> {
        suggestions.into_iter().map(|s| s.display_name).collect()
    }

    #[test]
    fn test_word_list_provider_matches_prefix() {
        let provider = WordListProvider::new(store(&["hello", "help", "world"]));
        let buffer = TextBuffer::new("hel");
        let context = QueryContext {
            query: "hel",
            separator: None,
            cursor: Position::new(0, 3),
            has_file: true,
            editor: &buffer,
        };

        let found = provider.suggestions(&context, &Settings::default()).unwrap();
        assert_eq!(names(found), vec!["help", "hello"]);
    }

    #[test]
    fn test_short_query_yields_nothing() {
        let provider = FileScannerProvider::new(store(&["hello"]));
        let buffer = TextBuffer::new("he");
        let context = QueryContext {
            query: "he",
            separator: None,
            cursor: Position::new(0, 2),
            has_file: true,
            editor: &buffer,
        };

        assert!(provider.suggestions(&context, &Settings::default()).unwrap().is_empty());

        let eager = Settings {
            min_word_trigger_length: 1,
            ..Settings::default()
        };
        assert_eq!(names(provider.suggestions(&context, &eager).unwrap()), vec!["hello"]);
    }

    #[test]
    fn test_scanned_query_is_not_offered_back() {
        let provider = FileScannerProvider::new(store(&["A", "meadow", "and", "a", "meander", "The", "mea"]));
        let buffer = TextBuffer::new("A meadow and a meander.\nThe mea");
        let context = QueryContext {
            query: "mea",
            separator: Some(' '),
            cursor: Position::new(1, 7),
            has_file: true,
            editor: &buffer,
        };

        let found = provider.suggestions(&context, &Settings::default()).unwrap();
        assert_eq!(names(found), vec!["meadow", "meander"]);
    }

    #[test]
    fn test_disabled_provider_is_silent() {
        let provider = WordListProvider::new(store(&["hello"]));
        let buffer = TextBuffer::new("hel");
        let context = QueryContext {
            query: "hel",
            separator: None,
            cursor: Position::new(0, 3),
            has_file: true,
            editor: &buffer,
        };
        let mut settings = Settings::default();
        settings.providers.word_list_enabled = false;

        assert!(provider.suggestions(&context, &settings).unwrap().is_empty());
    }
}
