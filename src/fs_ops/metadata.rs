//! Metadata transfer.
//! - Copies timestamps (atime, mtime) and permissions from a source's metadata onto a path.
//! - Timestamps are set before permissions so a read-only mode cannot block them.
//! - Strict: any failure is returned; callers stop the run rather than leave drift behind.

use filetime::{set_file_times, FileTime};
use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

use super::helpers::io_error_with_help_io;

/// Apply `src_meta`'s timestamps and permission bits to `dest`.
pub fn apply_metadata(dest: &Path, src_meta: &fs::Metadata) -> io::Result<()> {
    let mtime = FileTime::from_last_modification_time(src_meta);
    let atime = FileTime::from_last_access_time(src_meta);
    set_file_times(dest, atime, mtime).map_err(io_error_with_help_io("set timestamps", dest))?;
    trace!(path = %dest.display(), mtime = %mtime, "set atime/mtime");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = src_meta.permissions().mode() & 0o777;
        fs::set_permissions(dest, fs::Permissions::from_mode(mode))
            .map_err(io_error_with_help_io("set permissions", dest))?;
        trace!(path = %dest.display(), mode = format!("{:o}", mode), "set permissions");
    }

    #[cfg(not(unix))]
    {
        let ro = src_meta.permissions().readonly();
        let mut perms = fs::metadata(dest)
            .map_err(io_error_with_help_io("stat", dest))?
            .permissions();
        if perms.readonly() != ro {
            perms.set_readonly(ro);
            fs::set_permissions(dest, perms).map_err(io_error_with_help_io("set readonly attribute", dest))?;
        }
        trace!(path = %dest.display(), readonly = ro, "set readonly attribute");
    }

    Ok(())
}

/// Copy metadata (never content) from the file at `from` onto the file at `to`.
pub fn copy_metadata(from: &Path, to: &Path) -> io::Result<()> {
    let meta = fs::metadata(from).map_err(io_error_with_help_io("stat", from))?;
    apply_metadata(to, &meta)
}
