//! Snapshot error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

/// Errors that can occur during snapshot operations.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// IO error (write or delete failure).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot file is missing or not valid JSON.
    #[error("unreadable session file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Snapshot file is well-formed JSON but does not match the
    /// path-to-action schema.
    #[error("corrupt session file {path}: {message}")]
    CorruptSession { path: PathBuf, message: String },

    /// JSON serialization failure while writing a snapshot.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SnapshotError {
    /// Create a parse error for the given file.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a corrupt session error for the given file.
    pub fn corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::CorruptSession {
            path: path.into(),
            message: message.into(),
        }
    }
}
