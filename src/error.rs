//! Error types for history operations

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for history operations
pub type HistoryResult<T> = Result<T, HistoryError>;

/// Errors surfaced by mutating history operations
///
/// Read paths never produce these for corrupt data; a bad history file
/// degrades to an empty collection instead.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to write history file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("History queue requires a running tokio runtime")]
    NoRuntime,

    #[error("History queue is closed")]
    QueueClosed,

    #[error("History task aborted before completing")]
    TaskAborted,
}

impl HistoryError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HistoryError::Write {
            path: path.into(),
            source,
        }
    }
}
