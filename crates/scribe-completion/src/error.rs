//! Error types for the completion engine

use thiserror::Error;

/// Completion engine error
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A provider failed while producing suggestions
    #[error("Provider '{provider}' failed: {message}")]
    ProviderError { provider: String, message: String },

    /// Word index build or publish error
    #[error("Index error: {0}")]
    IndexError(String),

    /// A suggestion violates the provider contract (e.g. inverted override span)
    #[error("Invalid suggestion '{name}': {reason}")]
    InvalidSuggestion { name: String, reason: String },

    /// Snippet expansion failed or is unavailable
    #[error("Snippet error: {0}")]
    SnippetError(String),

    /// Key binding could not be parsed
    #[error("Invalid key binding: {0}")]
    KeyBindingError(String),

    /// Character class did not compile
    #[error("Invalid character class: {0}")]
    PatternError(#[from] regex::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CompletionError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        CompletionError::ConfigError(message.into())
    }

    /// Create a provider error
    pub fn provider_error(provider: impl Into<String>, message: impl Into<String>) -> Self {
        CompletionError::ProviderError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an index error
    pub fn index_error(message: impl Into<String>) -> Self {
        CompletionError::IndexError(message.into())
    }

    /// Create an invalid suggestion error
    pub fn invalid_suggestion(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CompletionError::InvalidSuggestion {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a snippet error
    pub fn snippet_error(message: impl Into<String>) -> Self {
        CompletionError::SnippetError(message.into())
    }
}

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;
