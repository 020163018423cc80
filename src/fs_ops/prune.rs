//! Upward pruning of empty directories.
//! Iterative: walks parent by parent, so depth is bounded only by the path itself.

use std::fs;
use std::io;
use std::path::Path;
use tracing::trace;

use super::helpers::io_error_with_help_io;

fn is_empty_dir(dir: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(dir)?.next().is_none())
}

/// Remove `dir` if it is empty, then keep removing its parents while they become
/// empty. Stops at the first non-empty directory, at `root` (never removed), at a
/// symlink (the link is not a directory of ours to remove), or when `dir` is not
/// inside `root`. A directory that no longer exists ends the walk quietly.
/// Returns the number of directories removed.
pub fn prune_upward(root: &Path, dir: &Path) -> io::Result<usize> {
    let mut removed = 0;
    let mut cur = dir.to_path_buf();

    while cur != root && cur.starts_with(root) {
        match fs::symlink_metadata(&cur) {
            Ok(meta) if meta.file_type().is_symlink() => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => break,
            Err(e) => return Err(io_error_with_help_io("stat directory", &cur)(e)),
        }
        match is_empty_dir(&cur) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.kind() == io::ErrorKind::NotFound => break,
            Err(e) => return Err(io_error_with_help_io("list directory", &cur)(e)),
        }
        fs::remove_dir(&cur).map_err(io_error_with_help_io("remove empty directory", &cur))?;
        trace!(dir = %cur.display(), "removed empty directory");
        removed += 1;
        if !cur.pop() {
            break;
        }
    }
    Ok(removed)
}
