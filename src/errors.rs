//! Typed error definitions for synchronize.
//! Provides a small set of well-known failure modes for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Source path does not exist")]
    SourceNotFound(PathBuf),

    #[error("Destination path does not exist")]
    DestinationNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Source and destination cannot be the same")]
    SameRoot(PathBuf),

    #[error("Source cannot be a subdirectory of destination")]
    SourceInsideDestination { src: PathBuf, dst: PathBuf },

    #[error("Destination cannot be a subdirectory of source")]
    DestinationInsideSource { src: PathBuf, dst: PathBuf },

    #[error("Insufficient disk space for destination {dest}: need {required} bytes, have {available} bytes")]
    InsufficientSpace {
        required: u64,
        available: u64,
        dest: PathBuf,
    },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl SyncError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            SyncError::SourceNotFound(_) => 10,
            SyncError::DestinationNotFound(_) => 11,
            SyncError::NotADirectory(_) => 12,
            SyncError::SameRoot(_) => 13,
            SyncError::SourceInsideDestination { .. } => 14,
            SyncError::DestinationInsideSource { .. } => 15,
            SyncError::InsufficientSpace { .. } => 20,
            SyncError::Interrupted => 30,
        }
    }
}
