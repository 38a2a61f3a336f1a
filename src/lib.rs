//! Shared fixtures for the end-to-end suites under `tests/`

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway notes workspace on disk
pub struct NotesFixture {
    dir: TempDir,
}

impl NotesFixture {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Write `contents` to `relative`, creating parent directories
    pub fn write(&self, relative: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}
