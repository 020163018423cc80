//! Atomic replace.
//! - Renames a fully written temp file over the final path.
//! - std::fs::rename replaces an existing target on both Unix and Windows.
//! - On Unix, best-effort fsync of the parent directory after the rename.

use std::fs;
use std::io;
use std::path::Path;

use super::helpers::io_error_with_help_io;

pub(super) fn replace_atomic(tmp: &Path, dst: &Path) -> io::Result<()> {
    fs::rename(tmp, dst).map_err(io_error_with_help_io("rename temporary file into place", dst))?;

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // A failed directory fsync must not turn a completed rename into an error.
        let _ = super::util::fsync_dir(parent);
    }
    Ok(())
}
