//! Error types for luna-snippets

/// Result type for luna-snippets operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading snippets
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The snippet file could not be read
    #[error(transparent)]
    Fs(#[from] luna_fs::Error),

    /// The snippet file is not valid TextMate snippet JSON
    #[error("Invalid snippet file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
