//! Error types for luna-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from luna-typings
    #[error(transparent)]
    Typings(#[from] luna_typings::Error),

    /// Error from luna-snippets
    #[error(transparent)]
    Snippets(#[from] luna_snippets::Error),

    /// Error from luna-fs
    #[error(transparent)]
    Fs(#[from] luna_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
