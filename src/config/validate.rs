//! Root validation.
//! Both roots must exist and be directories, and after resolving symlinks they
//! must be disjoint: identical or nested roots would make the sync feed on itself.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::SyncError;

/// The two validated roots of a run, kept as the user spelled them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRoots {
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl SyncRoots {
    /// Pair two roots without checks. Callers outside tests go through `validate_roots`.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

fn ensure_dir(path: &Path, missing: fn(PathBuf) -> SyncError) -> Result<(), SyncError> {
    if !path.exists() {
        return Err(missing(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(SyncError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Validate the pair of roots for a run.
pub fn validate_roots(source: &Path, destination: &Path) -> Result<SyncRoots> {
    let checked = ensure_dir(source, SyncError::SourceNotFound)
        .and_then(|()| ensure_dir(destination, SyncError::DestinationNotFound))
        .and_then(|()| ensure_disjoint(source, destination));
    checked?;
    debug!(
        src = %source.display(),
        dst = %destination.display(),
        "Roots validated"
    );
    Ok(SyncRoots::new(source, destination))
}

fn ensure_disjoint(source: &Path, destination: &Path) -> Result<(), SyncError> {
    let src_real = dunce::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
    let dst_real = dunce::canonicalize(destination).unwrap_or_else(|_| destination.to_path_buf());

    if src_real == dst_real {
        return Err(SyncError::SameRoot(src_real));
    }
    if src_real.starts_with(&dst_real) {
        return Err(SyncError::SourceInsideDestination {
            src: src_real,
            dst: dst_real,
        });
    }
    if dst_real.starts_with(&src_real) {
        return Err(SyncError::DestinationInsideSource {
            src: src_real,
            dst: dst_real,
        });
    }
    Ok(())
}
