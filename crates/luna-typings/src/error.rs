//! Error types for luna-typings

use std::path::PathBuf;

/// Result type for luna-typings operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing typings
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A requested declaration path is not a usable relative reference
    #[error("Invalid declaration reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// The bundle does not ship the requested declaration
    #[error("Declaration '{reference}' not found in {bundle}")]
    DeclarationNotFound { reference: String, bundle: String },

    /// The typings target folder cannot be created
    #[error("Typings folder unavailable at {path}: {source}")]
    TargetUnavailable {
        path: PathBuf,
        #[source]
        source: luna_fs::Error,
    },

    /// An installed file has no relative path from the index folder
    #[error("Cannot reference {path} from index folder {index_dir}")]
    UnrelatedIndexPath { path: PathBuf, index_dir: PathBuf },

    /// A background copy task stopped before reporting a result
    #[error("Copy task for '{reference}' did not complete: {message}")]
    TaskFailed { reference: String, message: String },

    /// The plugin typings mapping could not be used
    #[error("Plugin typings mapping unavailable: {message}")]
    PluginMapping { message: String },

    /// Filesystem error from luna-fs
    #[error(transparent)]
    Fs(#[from] luna_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
