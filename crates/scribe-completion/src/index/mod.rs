//! Word indices: bucketed word storage, prefix matching, builders and the publish store
//!
//! A [`WordIndex`] maps a leading char to the words starting with it, shortest first.
//! Builders produce a fresh index in one go; [`IndexStore`] publishes it with a single
//! pointer swap so a query sees either the old or the new index, never a mix.

pub mod builder;
pub mod store;

pub use builder::{
    ContentIndexBuilder, DirectoryDocumentSource, Document, DocumentSource, IndexBuilder,
    StaticDocumentSource, WordListBuilder,
};
pub use store::{IndexRebuilder, IndexStore, RebuildOutcome};

use crate::config::{Settings, WordInsertionMode};
use crate::types::Suggestion;
use std::collections::HashMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Words bucketed by their first char
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordIndex {
    buckets: HashMap<char, Vec<String>>,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from buckets whose order is already final
    pub fn from_buckets<I>(buckets: I) -> Self
    where
        I: IntoIterator<Item = (char, Vec<String>)>,
    {
        Self {
            buckets: buckets
                .into_iter()
                .filter(|(_, words)| !words.is_empty())
                .collect(),
        }
    }

    /// Bucket `words` by first char and order each bucket by ascending length.
    /// The sort is stable, so equally long words keep their input order.
    pub fn from_words<I>(words: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut buckets: HashMap<char, Vec<String>> = HashMap::new();
        for word in words {
            if let Some(first) = word.chars().next() {
                buckets.entry(first).or_default().push(word);
            }
        }
        for bucket in buckets.values_mut() {
            bucket.sort_by_key(|w| w.chars().count());
        }
        Self { buckets }
    }

    /// Candidates for a leading char, in index order
    pub fn lookup(&self, first: char) -> &[String] {
        self.buckets.get(&first).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keys(&self) -> impl Iterator<Item = char> + '_ {
        self.buckets.keys().copied()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn word_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Strip combining marks after canonical decomposition: `é` → `e`
pub fn fold_diacritics(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Prefix filter over a [`WordIndex`] following the case and diacritic settings
#[derive(Debug, Clone, Copy)]
pub struct WordMatcher {
    mode: WordInsertionMode,
    fold_diacritics: bool,
}

impl WordMatcher {
    pub fn new(mode: WordInsertionMode, fold_diacritics: bool) -> Self {
        Self {
            mode,
            fold_diacritics,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.word_insertion_mode,
            settings.ignore_diacritics_when_filtering,
        )
    }

    fn normalize(&self, text: &str) -> String {
        let folded = if self.fold_diacritics {
            fold_diacritics(text)
        } else {
            text.to_string()
        };
        if self.mode.ignores_case() {
            folded.to_lowercase()
        } else {
            folded
        }
    }

    /// Buckets that may hold matches for `first`: its own bucket first, then any other
    /// bucket whose key normalizes to the same thing
    fn candidate_buckets<'i>(&self, index: &'i WordIndex, first: char) -> Vec<&'i [String]> {
        let mut buckets = vec![index.lookup(first)];
        if self.mode.ignores_case() || self.fold_diacritics {
            let wanted = self.normalize(&first.to_string());
            let mut others: Vec<char> = index
                .keys()
                .filter(|k| *k != first && self.normalize(&k.to_string()) == wanted)
                .collect();
            others.sort_unstable();
            buckets.extend(others.into_iter().map(|k| index.lookup(k)));
        }
        buckets.retain(|b| !b.is_empty());
        buckets
    }

    /// Words starting with `query`, in index order
    pub fn matching<'i>(&self, index: &'i WordIndex, query: &str) -> Vec<&'i str> {
        let Some(first) = query.chars().next() else {
            return Vec::new();
        };
        let needle = self.normalize(query);
        let buckets = self.candidate_buckets(index, first);
        let merged = buckets.len() > 1;

        let mut found: Vec<&str> = buckets
            .into_iter()
            .flat_map(|bucket| bucket.iter())
            .filter(|word| self.normalize(word).starts_with(&needle))
            .map(String::as_str)
            .collect();

        if merged {
            found.sort_by_key(|w| w.chars().count());
        }
        found
    }

    /// Turn matches into suggestions according to the insertion mode. A word that is
    /// the query itself under this matcher's normalization is not offered.
    pub fn suggestions(&self, index: &WordIndex, query: &str) -> Vec<Suggestion> {
        let typed = self.normalize(query);
        self.matching(index, query)
            .into_iter()
            .filter(|word| self.normalize(word) != typed)
            .map(|word| match self.mode {
                WordInsertionMode::IgnoreCaseAppend => {
                    let rest: String = word.chars().skip(query.chars().count()).collect();
                    Suggestion::new(format!("{}{}", query, rest))
                }
                _ => Suggestion::new(word),
            })
            .collect()
    }
}
