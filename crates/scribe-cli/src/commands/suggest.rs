// List the suggestions the popup would show at a cursor position

use super::{checked_cursor, Command};
use crate::error::CliResult;
use crate::output::OutputStyle;
use crate::workspace::{read_document, Workspace, WorkspaceOptions};
use scribe_completion::{Span, Suggestion, TriggerOutcome};
use std::path::PathBuf;
use tracing::info;

/// What the popup would show
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestReport {
    pub span: Span,
    pub suggestions: Vec<Suggestion>,
    pub selected: Option<usize>,
}

pub struct SuggestCommand {
    pub file: PathBuf,
    pub line: usize,
    pub ch: usize,
    pub options: WorkspaceOptions,
}

impl SuggestCommand {
    pub fn new(file: PathBuf, line: usize, ch: usize, options: WorkspaceOptions) -> Self {
        Self {
            file,
            line,
            ch,
            options,
        }
    }

    pub async fn run(&self) -> CliResult<Option<SuggestReport>> {
        let buffer = read_document(&self.file).await?;
        let cursor = checked_cursor(&buffer, self.line, self.ch)?;

        let workspace = Workspace::open(&self.options)?;
        workspace.index_word_lists(&self.options).await?;
        let text = buffer.text();
        workspace
            .index_documents(&self.options, Some((self.file.as_path(), text.as_str())))
            .await?;

        let mut engine = workspace.engine()?;
        match engine.trigger_manually(&buffer, cursor) {
            TriggerOutcome::Opened(_) => Ok(Some(SuggestReport {
                span: engine.popup().trigger_span(),
                suggestions: engine.suggestions().to_vec(),
                selected: engine.popup().selected_index(),
            })),
            TriggerOutcome::Closed | TriggerOutcome::Suppressed => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl Command for SuggestCommand {
    async fn execute(&self) -> CliResult<()> {
        let Some(report) = self.run().await? else {
            info!("No suggestions at {}:{}", self.line, self.ch);
            return Ok(());
        };

        let style = OutputStyle::default();
        println!(
            "{}",
            style.header(&format!(
                "{} suggestions for {}..{}",
                report.suggestions.len(),
                report.span.start,
                report.span.end
            ))
        );
        for (i, suggestion) in report.suggestions.iter().enumerate() {
            println!(
                "{}",
                style.suggestion(
                    i + 1,
                    &suggestion.display_name,
                    &suggestion.replacement_text,
                    report.selected == Some(i),
                )
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_completion::Position;

    #[tokio::test]
    async fn test_suggests_words_from_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.md");
        std::fs::write(&file, "A meadow and a meander.\nThe mea").unwrap();

        let command = SuggestCommand::new(file, 1, 7, WorkspaceOptions::default());
        let report = command.run().await.unwrap().unwrap();

        let names: Vec<_> = report.suggestions.iter().map(|s| s.display_name.as_str()).collect();
        // the scanned partial word "mea" is not offered back
        assert_eq!(names, vec!["meadow", "meander"]);
        assert_eq!(report.span.start, Position::new(1, 4));
        assert_eq!(report.selected, Some(0));
    }

    #[tokio::test]
    async fn test_nothing_to_suggest() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("note.md");
        std::fs::write(&file, "zz").unwrap();

        let command = SuggestCommand::new(file, 0, 2, WorkspaceOptions::default());
        assert_eq!(command.run().await.unwrap(), None);
    }
}
