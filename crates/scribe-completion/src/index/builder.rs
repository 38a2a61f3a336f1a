//! Index builders
//!
//! Two origins feed a [`WordIndex`]:
//!
//! * [`WordListBuilder`] reads a directory of one-word-per-line files.
//! * [`ContentIndexBuilder`] tokenizes documents from a [`DocumentSource`] with the same
//!   character class the trigger detector uses.
//!
//! Both always build a complete, fresh index; publishing is the store's job.

use super::WordIndex;
use crate::error::CompletionResult;
use crate::reject::RejectList;
use crate::trigger::CharacterClass;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Produces a complete word index from some origin
#[async_trait]
pub trait IndexBuilder: Send + Sync {
    fn name(&self) -> &str;

    /// Build a fresh index with rejected words already removed
    async fn build(&self, reject: &RejectList) -> CompletionResult<WordIndex>;
}

/// Raw text of one indexable document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub text: String,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Supplies the documents a content scan should read
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn documents(&self) -> CompletionResult<Vec<Document>>;
}

/// A fixed set of documents, e.g. the one currently open
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentSource {
    documents: Vec<Document>,
}

impl StaticDocumentSource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn single(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(vec![Document::new(name, text)])
    }
}

#[async_trait]
impl DocumentSource for StaticDocumentSource {
    async fn documents(&self) -> CompletionResult<Vec<Document>> {
        Ok(self.documents.clone())
    }
}

/// Every file under a root directory with one of the given extensions
#[derive(Debug, Clone)]
pub struct DirectoryDocumentSource {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirectoryDocumentSource {
    /// Markdown and plain-text files under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_extensions(root, ["md", "txt"])
    }

    pub fn with_extensions<I, S>(root: impl Into<PathBuf>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    fn wants(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|want| want.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

#[async_trait]
impl DocumentSource for DirectoryDocumentSource {
    async fn documents(&self) -> CompletionResult<Vec<Document>> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(false) {
            match entry {
                Ok(entry) if entry.file_type().is_file() && self.wants(entry.path()) => {
                    paths.push(entry.into_path());
                }
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable entry under {}: {}", self.root.display(), e),
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => documents.push(Document::new(path.display().to_string(), text)),
                Err(e) => warn!("Skipping document {}: {}", path.display(), e),
            }
        }
        debug!("Collected {} documents from {}", documents.len(), self.root.display());
        Ok(documents)
    }
}

/// Builds an index from line-delimited word lists
#[derive(Debug, Clone)]
pub struct WordListBuilder {
    directory: PathBuf,
    min_word_length: usize,
}

impl WordListBuilder {
    pub fn new(directory: impl Into<PathBuf>, min_word_length: usize) -> Self {
        Self {
            directory: directory.into(),
            min_word_length,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Read every regular file in the directory, skipping unreadable ones.
    /// A missing directory yields no sources.
    pub async fn read_sources(&self) -> CompletionResult<Vec<String>> {
        if !tokio::fs::try_exists(&self.directory).await.unwrap_or(false) {
            debug!("Word list directory {} does not exist", self.directory.display());
            return Ok(Vec::new());
        }

        let mut entries = tokio::fs::read_dir(&self.directory).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            match entry.file_type().await {
                Ok(kind) if kind.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping word list {}: {}", path.display(), e),
            }
        }
        paths.sort();

        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            match tokio::fs::read_to_string(&path).await {
                Ok(text) => sources.push(text),
                Err(e) => warn!("Skipping word list {}: {}", path.display(), e),
            }
        }
        Ok(sources)
    }

    /// Index already-read sources. Each line is one candidate word.
    pub fn index_sources<S: AsRef<str>>(&self, sources: &[S], reject: &RejectList) -> WordIndex {
        let mut seen = HashSet::new();
        let mut words = Vec::new();
        for source in sources {
            for line in source.as_ref().lines() {
                let word = line.trim();
                if word.chars().count() < self.min_word_length || reject.has(word) {
                    continue;
                }
                if seen.insert(word) {
                    words.push(word.to_string());
                }
            }
        }
        WordIndex::from_words(words)
    }
}

#[async_trait]
impl IndexBuilder for WordListBuilder {
    fn name(&self) -> &str {
        "word-list"
    }

    async fn build(&self, reject: &RejectList) -> CompletionResult<WordIndex> {
        let sources = self.read_sources().await?;
        let index = self.index_sources(&sources, reject);
        info!(
            "Indexed {} words from {} word lists in {}",
            index.word_count(),
            sources.len(),
            self.directory.display()
        );
        Ok(index)
    }
}

/// Builds an index from the words found in documents
pub struct ContentIndexBuilder {
    source: Arc<dyn DocumentSource>,
    class: CharacterClass,
    min_word_length: usize,
}

impl ContentIndexBuilder {
    pub fn new(source: Arc<dyn DocumentSource>, class: CharacterClass, min_word_length: usize) -> Self {
        Self {
            source,
            class,
            min_word_length,
        }
    }

    /// Distinct tokens of all documents, shortest first, ties alphabetical
    pub fn index_documents(&self, documents: &[Document], reject: &RejectList) -> WordIndex {
        let mut distinct: HashSet<&str> = HashSet::new();
        for document in documents {
            for token in self.class.tokens(&document.text) {
                if token.chars().count() >= self.min_word_length {
                    distinct.insert(token);
                }
            }
        }

        let mut words: Vec<String> = distinct
            .into_iter()
            .filter(|w| !reject.has(w))
            .map(str::to_string)
            .collect();
        words.sort();
        WordIndex::from_words(words)
    }
}

#[async_trait]
impl IndexBuilder for ContentIndexBuilder {
    fn name(&self) -> &str {
        "content-scan"
    }

    async fn build(&self, reject: &RejectList) -> CompletionResult<WordIndex> {
        let documents = self.source.documents().await?;
        let index = self.index_documents(&documents, reject);
        info!(
            "Indexed {} words from {} documents",
            index.word_count(),
            documents.len()
        );
        Ok(index)
    }
}
