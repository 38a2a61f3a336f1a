//! Persistent list of display names the user never wants suggested again
use crate::error::CompletionResult;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Set of rejected display names, stored one per line on disk.
///
/// Shared behind an `Arc`; reads happen on every suggestion cycle, writes only on
/// explicit user action.
#[derive(Debug, Default)]
pub struct RejectList {
    names: RwLock<HashSet<String>>,
    path: Option<PathBuf>,
}

impl RejectList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: RwLock::new(names.into_iter().map(Into::into).collect()),
            path: None,
        }
    }

    /// Create a list backed by `path`; nothing is read until [`RejectList::load`]
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            names: RwLock::new(HashSet::new()),
            path: Some(path),
        }
    }

    /// Replace the in-memory set with the file contents. A missing file is an empty list.
    pub fn load(&self) -> CompletionResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !path.exists() {
            debug!("Reject list {} does not exist yet", path.display());
            return Ok(());
        }

        let content = std::fs::read_to_string(path)?;
        let loaded: HashSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        info!("Loaded {} rejected suggestions from {}", loaded.len(), path.display());
        *self.names.write() = loaded;
        Ok(())
    }

    /// Write the set back to its file, sorted for stable diffs
    pub fn save(&self) -> CompletionResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut names: Vec<String> = self.names.read().iter().cloned().collect();
        names.sort();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut content = names.join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has(&self, display_name: &str) -> bool {
        self.names.read().contains(display_name)
    }

    /// Drop every rejected word, keeping order
    pub fn filter(&self, words: Vec<String>) -> Vec<String> {
        let names = self.names.read();
        if names.is_empty() {
            return words;
        }
        words.into_iter().filter(|w| !names.contains(w)).collect()
    }

    /// Returns `true` if the name was not already rejected
    pub fn add(&self, display_name: impl Into<String>) -> bool {
        self.names.write().insert(display_name.into())
    }

    pub fn remove(&self, display_name: &str) -> bool {
        self.names.write().remove(display_name)
    }

    pub fn len(&self) -> usize {
        self.names.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.read().is_empty()
    }
}
