// Apply a suggestion at a cursor position and show the result

use super::{checked_cursor, Command};
use crate::error::{CliError, CliResult};
use crate::workspace::{read_document, Workspace, WorkspaceOptions};
use scribe_completion::{Editor, NavDirection, Position, TriggerOutcome};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteReport {
    /// Display name of the applied suggestion
    pub applied: String,
    /// Cursor line after applying
    pub line: String,
    pub cursor: Position,
}

pub struct CompleteCommand {
    pub file: PathBuf,
    pub line: usize,
    pub ch: usize,
    /// 1-based row of the popup to apply
    pub pick: usize,
    pub options: WorkspaceOptions,
}

impl CompleteCommand {
    pub fn new(file: PathBuf, line: usize, ch: usize, pick: usize, options: WorkspaceOptions) -> Self {
        Self {
            file,
            line,
            ch,
            pick,
            options,
        }
    }

    pub async fn run(&self) -> CliResult<Option<CompleteReport>> {
        if self.pick == 0 {
            return Err(CliError::invalid_argument("--pick counts from 1"));
        }
        let mut buffer = read_document(&self.file).await?;
        let cursor = checked_cursor(&buffer, self.line, self.ch)?;

        let workspace = Workspace::open(&self.options)?;
        workspace.index_word_lists(&self.options).await?;
        let text = buffer.text();
        workspace
            .index_documents(&self.options, Some((self.file.as_path(), text.as_str())))
            .await?;

        let mut engine = workspace.engine()?;
        let count = match engine.trigger_manually(&buffer, cursor) {
            TriggerOutcome::Opened(count) => count,
            TriggerOutcome::Closed | TriggerOutcome::Suppressed => return Ok(None),
        };
        if self.pick > count {
            return Err(CliError::invalid_argument(format!(
                "--pick {} but only {} suggestions",
                self.pick, count
            )));
        }

        if engine.popup().selected_index().is_none() {
            engine.navigate(NavDirection::None);
        }
        for _ in 1..self.pick {
            engine.navigate(NavDirection::Next);
        }

        let applied = engine
            .popup()
            .selected()
            .map(|s| s.display_name.clone())
            .ok_or_else(|| CliError::Internal("no suggestion selected".to_string()))?;
        let Some(outcome) = engine.apply_selected(&mut buffer)? else {
            return Err(CliError::Internal("no suggestion selected".to_string()));
        };

        Ok(Some(CompleteReport {
            applied,
            line: buffer.line(outcome.cursor.line).unwrap_or_default(),
            cursor: outcome.cursor,
        }))
    }
}

#[async_trait::async_trait]
impl Command for CompleteCommand {
    async fn execute(&self) -> CliResult<()> {
        match self.run().await? {
            Some(report) => {
                println!("{}", report.line);
                println!("cursor {}", report.cursor);
            }
            None => tracing::info!("No suggestions at {}:{}", self.line, self.ch),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_from_word_lists() {
        let dir = tempfile::tempdir().unwrap();
        let lists = dir.path().join("lists");
        std::fs::create_dir(&lists).unwrap();
        std::fs::write(lists.join("words.txt"), "hello\nhelp\n").unwrap();
        let file = dir.path().join("note.md");
        std::fs::write(&file, "he wor there").unwrap();
        std::fs::write(lists.join("more.txt"), "world\n").unwrap();

        let options = WorkspaceOptions {
            word_lists: Some(lists),
            ..WorkspaceOptions::default()
        };
        let report = CompleteCommand::new(file, 0, 6, 1, options)
            .run()
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report.applied, "world");
        assert_eq!(report.line, "he world there");
        assert_eq!(report.cursor, Position::new(0, 8));
    }

    #[tokio::test]
    async fn test_pick_out_of_range() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.md");
        std::fs::write(&file, "window win").unwrap();

        let command = CompleteCommand::new(file, 0, 10, 5, WorkspaceOptions::default());
        assert!(matches!(
            command.run().await,
            Err(CliError::InvalidArgument { .. })
        ));
    }
}
