// Command routing and dispatch

use crate::commands::*;
use crate::error::CliResult;
use crate::workspace::WorkspaceOptions;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Scribe - inline word completion for Markdown notes
#[derive(Parser, Debug)]
#[command(name = "scribe")]
#[command(bin_name = "scribe")]
#[command(about = "Inline word completion for Markdown notes")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (.yaml, .yml or .json)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory of one-word-per-line word lists
    #[arg(long, global = true, value_name = "DIR")]
    pub word_lists: Option<PathBuf>,

    /// Directory of notes to scan for words instead of the open document
    #[arg(long, global = true, value_name = "DIR")]
    pub vault: Option<PathBuf>,

    /// File of rejected words, one per line
    #[arg(long, global = true, value_name = "FILE")]
    pub reject_list: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List suggestions at a position
    Suggest {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// 0-based line
        #[arg(long)]
        line: usize,

        /// 0-based column in chars
        #[arg(long)]
        ch: usize,
    },

    /// Apply a suggestion at a position and print the resulting line
    Complete {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(long)]
        line: usize,

        #[arg(long)]
        ch: usize,

        /// Popup row to apply, counting from 1
        #[arg(long, default_value_t = 1)]
        pick: usize,
    },

    /// Build a content index for a directory and print bucket statistics
    Scan {
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}

impl Cli {
    pub fn workspace_options(&self) -> WorkspaceOptions {
        WorkspaceOptions {
            config: self.config.clone(),
            word_lists: self.word_lists.clone(),
            vault: self.vault.clone(),
            reject_list: self.reject_list.clone(),
        }
    }
}

pub struct CommandRouter;

impl CommandRouter {
    /// Build the handler for a parsed command line
    pub fn command_for(cli: &Cli) -> Box<dyn Command> {
        let options = cli.workspace_options();
        match cli.command.clone() {
            Commands::Suggest { file, line, ch } => Box::new(SuggestCommand::new(file, line, ch, options)),
            Commands::Complete {
                file,
                line,
                ch,
                pick,
            } => Box::new(CompleteCommand::new(file, line, ch, pick, options)),
            Commands::Scan { dir } => Box::new(ScanCommand::new(dir, options)),
        }
    }

    pub async fn dispatch(cli: &Cli) -> CliResult<()> {
        Self::command_for(cli).execute().await
    }
}
