//! I/O error enrichment.
//!
//! Adds the operation, the path and a short platform-aware hint to an `io::Error`.
//!
//! Usage:
//!   // in functions returning anyhow::Result<_>
//!   fs::remove_file(p).map_err(io_error_with_help("remove file", p))?;
//!
//!   // in functions returning io::Result<_> (ErrorKind is preserved)
//!   File::open(p).map_err(io_error_with_help_io("open file", p))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

fn hint_for_os_code(code: i32) -> Option<&'static str> {
    #[cfg(unix)]
    {
        match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
            libc::ENOENT => Some("path not found; it may have been removed during the run"),
            libc::ENOTEMPTY => Some("directory not empty"),
            libc::ENOSPC => Some("insufficient space on device"),
            libc::EROFS => Some("read-only filesystem; cannot write here"),
            libc::ENAMETOOLONG => Some("filename or path too long"),
            libc::EMFILE | libc::ENFILE => Some("too many open files"),
            _ => None,
        }
    }
    #[cfg(windows)]
    {
        match code {
            5 => Some("access denied; check permissions"),
            2 | 3 => Some("path not found; it may have been removed during the run"),
            32 => Some("sharing violation; file is in use"),
            112 => Some("insufficient disk space"),
            145 => Some("directory not empty"),
            206 => Some("filename or path too long"),
            _ => None,
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = code;
        None
    }
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(code) = e.raw_os_error() {
        if let Some(hint) = hint_for_os_code(code) {
            msg.push_str(" - ");
            msg.push_str(hint);
        }
    } else if e.kind() == io::ErrorKind::PermissionDenied {
        msg.push_str(" - permission denied; check ownership and write permissions");
    }
    msg
}

/// Closure for `.map_err(...)` converting io::Error -> anyhow::Error.
pub fn io_error_with_help<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// Closure for `.map_err(...)` that keeps the io::Error type and its ErrorKind.
pub fn io_error_with_help_io<'a>(
    op: &'a str,
    path: &'a Path,
) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_variant_preserves_kind_and_mentions_path() {
        let p = Path::new("/no/such/file");
        let e = io::Error::from(io::ErrorKind::NotFound);
        let enriched = io_error_with_help_io("open", p)(e);
        assert_eq!(enriched.kind(), io::ErrorKind::NotFound);
        assert!(enriched.to_string().contains("/no/such/file"));
    }

    #[test]
    fn anyhow_variant_adds_hint_for_permission_denied() {
        let p = Path::new("/locked");
        let e = io::Error::from(io::ErrorKind::PermissionDenied);
        let msg = io_error_with_help("remove file", p)(e).to_string();
        assert!(msg.starts_with("remove file '/locked'"));
        assert!(msg.contains("permission denied"));
    }
}
