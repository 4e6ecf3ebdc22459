//! Error types for luna-fs

use std::path::PathBuf;

/// Result type for luna-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in luna-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read copy source {path}: {source}")]
    CopySource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write copy destination {path}: {source}")]
    CopyDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Failed to serialize {format} config for {path}: {message}")]
    ConfigSerialize {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the underlying I/O error is `NotFound`.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Io { source, .. }
            | Self::CopySource { source, .. }
            | Self::CopyDestination { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
