//! Tree enumeration.
//! Lists every non-directory entry under a root as a `RelPath`, plus every directory
//! that holds no files at any depth.
//!
//! Notes:
//! - Descent is iterative (walkdir keeps its own stack), so deep trees cannot overflow.
//! - Symlinks are followed: a link to a file is listed as a file, a link to a
//!   directory is descended into. Links that point back at an ancestor are logged
//!   and skipped; dangling links are ignored.
//! - A directory that cannot be read due to permissions is logged and skipped: it
//!   contributes no files and is never reported as empty. Its ancestors are treated
//!   as occupied since they hold something we could not inspect.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use super::relpath::RelPath;
use crate::shutdown;

/// Result of enumerating one root. Vectors are in walk order (unsorted).
#[derive(Debug, Default, Clone)]
pub struct TreeListing {
    pub files: Vec<RelPath>,
    pub empty_dirs: Vec<RelPath>,
    /// Directories skipped because they could not be read, and symlink loops.
    pub skipped: Vec<PathBuf>,
}

/// Enumerate `root` recursively. The root itself is never part of the output.
pub fn enumerate_tree(root: &Path) -> Result<TreeListing> {
    let mut listing = TreeListing::default();
    let mut dirs: Vec<RelPath> = Vec::new();
    // Entries we could not look inside; neither they nor their parents count as empty.
    let mut opaque: Vec<RelPath> = Vec::new();

    for item in WalkDir::new(root).min_depth(1).follow_links(true) {
        shutdown::ensure_running()?;
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                if let Some(ancestor) = err.loop_ancestor() {
                    warn!(
                        path = %path.display(),
                        ancestor = %ancestor.display(),
                        "skipping symlink loop"
                    );
                    if let Some(rel) = RelPath::from_path(root, &path) {
                        opaque.push(rel);
                    }
                    listing.skipped.push(path);
                    continue;
                }
                match err.io_error().map(io::Error::kind) {
                    Some(io::ErrorKind::PermissionDenied) => {
                        warn!(path = %path.display(), error = %err, "skipping unreadable directory");
                        if let Some(rel) = RelPath::from_path(root, &path) {
                            opaque.push(rel);
                        }
                        listing.skipped.push(path);
                        continue;
                    }
                    Some(io::ErrorKind::NotFound) => {
                        debug!(path = %path.display(), "entry vanished or dangling link");
                        if fs::symlink_metadata(&path).is_ok() {
                            if let Some(rel) = RelPath::from_path(root, &path) {
                                opaque.push(rel);
                            }
                        }
                        continue;
                    }
                    _ => {
                        return Err(err)
                            .with_context(|| format!("enumerate '{}'", root.display()));
                    }
                }
            }
        };

        let Some(rel) = RelPath::from_path(root, entry.path()) else {
            warn!(path = %entry.path().display(), "skipping entry with non UTF-8 name");
            continue;
        };

        if entry.file_type().is_dir() {
            dirs.push(rel);
        } else {
            trace!(path = %rel, "file");
            listing.files.push(rel);
        }
    }

    let mut occupied: HashSet<RelPath> = HashSet::new();
    for rel in &listing.files {
        mark_ancestors(&mut occupied, rel.parent());
    }
    for rel in &opaque {
        mark_ancestors(&mut occupied, Some(rel.clone()));
    }

    listing.empty_dirs = dirs.into_iter().filter(|d| !occupied.contains(d)).collect();

    debug!(
        root = %root.display(),
        files = listing.files.len(),
        empty_dirs = listing.empty_dirs.len(),
        skipped = listing.skipped.len(),
        "enumerated tree"
    );
    Ok(listing)
}

/// Insert `start` and all its ancestors; stops early once a known ancestor is hit.
fn mark_ancestors(occupied: &mut HashSet<RelPath>, start: Option<RelPath>) {
    let mut cur = start;
    while let Some(dir) = cur {
        if dir.is_root() || !occupied.insert(dir.clone()) {
            break;
        }
        cur = dir.parent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn sorted(mut v: Vec<RelPath>) -> Vec<String> {
        v.sort();
        v.into_iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn lists_nested_files_with_forward_slashes() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("a.txt").write_str("a").unwrap();
        dir.child("sub/b.txt").write_str("b").unwrap();
        dir.child("sub/deeper/c.txt").write_str("c").unwrap();

        let listing = enumerate_tree(dir.path()).unwrap();
        assert_eq!(sorted(listing.files), ["a.txt", "sub/b.txt", "sub/deeper/c.txt"]);
        assert!(listing.empty_dirs.is_empty());
    }

    #[test]
    fn reports_every_directory_without_files() {
        let dir = assert_fs::TempDir::new().unwrap();
        dir.child("keep/file.txt").write_str("x").unwrap();
        dir.child("keep/hollow").create_dir_all().unwrap();
        dir.child("chain/inner/leaf").create_dir_all().unwrap();

        let listing = enumerate_tree(dir.path()).unwrap();
        assert_eq!(sorted(listing.files), ["keep/file.txt"]);
        assert_eq!(
            sorted(listing.empty_dirs),
            ["chain", "chain/inner", "chain/inner/leaf", "keep/hollow"]
        );
    }

    #[test]
    fn empty_root_yields_nothing() {
        let dir = assert_fs::TempDir::new().unwrap();
        let listing = enumerate_tree(dir.path()).unwrap();
        assert!(listing.files.is_empty());
        assert!(listing.empty_dirs.is_empty());
    }
}
