//! Ordered provider chain
use crate::index::IndexStore;
use crate::providers::{CalloutProvider, FileScannerProvider, SuggestionProvider, WordListProvider};
use std::sync::Arc;

/// Ordered list of suggestion providers
///
/// The chain is built by the host and handed to the [`Aggregator`](crate::aggregator::Aggregator).
/// Order is precedence: earlier providers are asked first, and a blocking provider that
/// answers hides every provider after it.
///
/// # Example
///
/// ```
/// use scribe_completion::chain::ProviderChain;
/// use scribe_completion::index::IndexStore;
/// use std::sync::Arc;
///
/// let chain = ProviderChain::with_builtin_providers(
///     Arc::new(IndexStore::new()),
///     Arc::new(IndexStore::new()),
/// );
/// assert_eq!(chain.names(), vec!["callout", "file-scanner", "word-list"]);
/// ```
#[derive(Clone, Default)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn SuggestionProvider>>,
}

impl ProviderChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the default chain: callouts, then scanned words, then word lists
    ///
    /// # Arguments
    ///
    /// * `scanned` - Store fed by content scans
    /// * `word_lists` - Store fed by word list files
    pub fn with_builtin_providers(scanned: Arc<IndexStore>, word_lists: Arc<IndexStore>) -> Self {
        Self::new()
            .with(Arc::new(CalloutProvider::new()))
            .with(Arc::new(FileScannerProvider::new(scanned)))
            .with(Arc::new(WordListProvider::new(word_lists)))
    }

    /// Append a provider, returning the chain
    pub fn with(mut self, provider: Arc<dyn SuggestionProvider>) -> Self {
        self.push(provider);
        self
    }

    /// Append a provider at the lowest precedence
    pub fn push(&mut self, provider: Arc<dyn SuggestionProvider>) {
        self.providers.push(provider);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn SuggestionProvider>> {
        self.providers.iter()
    }

    /// Provider names in precedence order
    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
