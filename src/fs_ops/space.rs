use anyhow::Result;
use std::path::Path;
use tracing::debug;

use crate::errors::SyncError;
use crate::platform::free_space_bytes;

/// Headroom kept on top of the summed copy size.
const CUSHION: u64 = 4 * 1024 * 1024;

pub(crate) fn format_bytes(n: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let f = n as f64;
    if f >= GB {
        format!("{:.1} GiB", f / GB)
    } else if f >= MB {
        format!("{:.1} MiB", f / MB)
    } else if f >= KB {
        format!("{:.1} KiB", f / KB)
    } else {
        format!("{} B", n)
    }
}

/// Fail with `SyncError::InsufficientSpace` when `dst_root`'s volume cannot hold
/// `required` bytes plus a small cushion. If free space cannot be queried the
/// check is skipped.
pub fn ensure_space_for_copy(dst_root: &Path, required: u64) -> Result<()> {
    if required == 0 {
        return Ok(());
    }
    let free = match free_space_bytes(dst_root) {
        Ok(n) => n,
        Err(e) => {
            debug!(path = %dst_root.display(), error = %e, "free space unavailable; skipping check");
            return Ok(());
        }
    };
    let needed = required.saturating_add(CUSHION);
    if free < needed {
        return Err(SyncError::InsufficientSpace {
            required: needed,
            available: free,
            dest: dst_root.to_path_buf(),
        }
        .into());
    }
    debug!(
        path = %dst_root.display(),
        required = %format_bytes(required),
        free = %format_bytes(free),
        "free space check passed"
    );
    Ok(())
}
