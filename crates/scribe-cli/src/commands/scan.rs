// Build a content index for a directory and report bucket statistics

use super::Command;
use crate::error::{CliError, CliResult};
use crate::output::OutputStyle;
use crate::workspace::{Workspace, WorkspaceOptions};
use scribe_completion::{
    ContentIndexBuilder, DirectoryDocumentSource, IndexRebuilder, IndexStore, RebuildOutcome,
};
use std::path::PathBuf;
use std::sync::Arc;

/// Size of one leading-char bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketStat {
    pub first: char,
    pub words: usize,
    /// Shortest word of the bucket
    pub sample: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub words: usize,
    pub buckets: Vec<BucketStat>,
}

pub struct ScanCommand {
    pub dir: PathBuf,
    pub options: WorkspaceOptions,
}

impl ScanCommand {
    pub fn new(dir: PathBuf, options: WorkspaceOptions) -> Self {
        Self { dir, options }
    }

    pub async fn run(&self) -> CliResult<ScanReport> {
        if !self.dir.is_dir() {
            return Err(CliError::invalid_argument(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }
        let workspace = Workspace::open(&self.options)?;
        let builder = ContentIndexBuilder::new(
            Arc::new(DirectoryDocumentSource::new(&self.dir)),
            workspace.character_class()?,
            workspace.settings.min_word_length,
        );
        let store = Arc::new(IndexStore::new());
        let rebuilder = IndexRebuilder::new(store.clone(), Arc::new(builder), workspace.reject.clone());

        let words = match rebuilder.rebuild().await? {
            RebuildOutcome::Published { words, .. } => words,
            RebuildOutcome::Coalesced => store.snapshot().word_count(),
        };

        let index = store.snapshot();
        let mut buckets: Vec<BucketStat> = index
            .keys()
            .map(|first| {
                let bucket = index.lookup(first);
                BucketStat {
                    first,
                    words: bucket.len(),
                    sample: bucket.first().cloned().unwrap_or_default(),
                }
            })
            .collect();
        buckets.sort_by(|a, b| b.words.cmp(&a.words).then(a.first.cmp(&b.first)));

        Ok(ScanReport { words, buckets })
    }
}

#[async_trait::async_trait]
impl Command for ScanCommand {
    async fn execute(&self) -> CliResult<()> {
        let report = self.run().await?;
        let style = OutputStyle::default();
        println!(
            "{}",
            style.header(&format!(
                "{} words in {} buckets",
                report.words,
                report.buckets.len()
            ))
        );
        for bucket in &report.buckets {
            println!("{}  {:>6}  {}", bucket.first, bucket.words, bucket.sample);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scan_reports_buckets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.md"), "river rock rain sky").unwrap();
        std::fs::write(dir.path().join("b.txt"), "sun river").unwrap();

        let report = ScanCommand::new(dir.path().to_path_buf(), WorkspaceOptions::default())
            .run()
            .await
            .unwrap();

        assert_eq!(report.words, 5);
        assert_eq!(
            report.buckets[0],
            BucketStat {
                first: 'r',
                words: 3,
                sample: "rain".to_string()
            }
        );
        assert_eq!(report.buckets[1].first, 's');
    }

    #[tokio::test]
    async fn test_scan_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let command = ScanCommand::new(dir.path().join("missing"), WorkspaceOptions::default());
        assert!(command.run().await.is_err());
    }
}
