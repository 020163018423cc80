//! Safe copy:
//! - Streams the source into a unique temp file in the destination directory
//! - Applies the source's timestamps and permissions to the temp file
//! - Atomically renames temp -> dest, so readers never see a half-written file
//!
//! A missing destination directory surfaces as `NotFound`; `copy_creating_parents`
//! reacts by creating the chain and retrying exactly once.

use anyhow::{anyhow, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

use super::atomic::replace_atomic;
use super::helpers::{io_error_with_help, io_error_with_help_io};
use super::io_copy::{copy_streaming, Durability};
use super::metadata::apply_metadata;
use super::util::unique_temp_path;

/// Copy content and metadata from `src` to `dest`. Returns bytes copied.
pub fn copy_with_metadata(src: &Path, dest: &Path, mode: Durability) -> io::Result<u64> {
    let dest_dir = dest.parent().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("destination has no parent: {}", dest.display()),
        )
    })?;
    let src_meta = fs::metadata(src).map_err(io_error_with_help_io("stat source", src))?;
    let tmp = unique_temp_path(dest_dir);

    let bytes = match copy_streaming(src, &tmp, mode) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            return Err(io_error_with_help_io("copy to temporary file", &tmp)(e));
        }
    };

    if let Err(e) = apply_metadata(&tmp, &src_meta).and_then(|()| replace_atomic(&tmp, dest)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(bytes)
}

/// `copy_with_metadata`, creating the destination's directory chain and retrying
/// once when the first attempt reports `NotFound`. A second failure is returned.
pub fn copy_creating_parents(src: &Path, dest: &Path, mode: Durability) -> Result<u64> {
    match copy_with_metadata(src, dest, mode) {
        Ok(n) => Ok(n),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let parent = dest
                .parent()
                .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;
            debug!(dir = %parent.display(), "creating missing destination directories");
            fs::create_dir_all(parent).map_err(io_error_with_help("create destination directory", parent))?;
            Ok(copy_with_metadata(src, dest, mode)?)
        }
        Err(e) => Err(e.into()),
    }
}
