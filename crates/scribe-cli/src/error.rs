// CLI error types

use scribe_completion::CompletionError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!("Invalid argument: {}\n\nRun 'scribe --help' for usage information.", message)
            }
            CliError::Completion(CompletionError::ConfigError(msg)) => {
                format!("Configuration error: {}\n\nCheck the file passed with --config.", msg)
            }
            CliError::Completion(e) => format!("Completion failed: {}", e),
            CliError::Internal(msg) => format!("Internal error: {}\n\nPlease report this issue.", msg),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
