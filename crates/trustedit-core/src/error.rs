//! Error types for the core crate.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Queue precondition violation.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    /// Snapshot store failure (IO, parse, corrupt file).
    #[error("snapshot error: {0}")]
    Snapshot(#[from] trustedit_snapshot::SnapshotError),

    /// A changeset could not be serialized to path/action pairs.
    #[error("changeset serialization failed: {0}")]
    Serialization(String),

    /// The trust store collaborator rejected an apply.
    #[error("trust store apply failed: {0}")]
    Apply(String),
}

/// Queue-specific errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    /// Dequeue on an empty pending queue.
    #[error("changeset queue is empty")]
    Empty,
}
