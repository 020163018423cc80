//! Plan executor.
//! Applies a `SyncPlan` in a fixed order:
//!   1. remove destination-only files (pruning directories they leave empty)
//!   2. copy new files, then updated files
//!   3. re-scan both roots for empty directories and prune them (scope permitting)
//!   4. repair metadata on the source side, then on the destination side
//!
//! Empty directories are re-scanned rather than taken from the plan because steps 1
//! and 2 change which directories hold files. The first failing operation aborts
//! the run; work already done stays done and a re-run converges.

use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::SyncRoots;
use crate::fs_ops::{
    Durability, copy_creating_parents, copy_metadata, ensure_space_for_copy, io_error_with_help,
    prune_upward,
};
use crate::output;
use crate::plan::{PlanScope, SyncPlan, scan_empty_dirs};
use crate::shutdown;
use crate::tree::{Exclusions, RelPath};

/// Which root an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Source => "src",
            Side::Destination => "dst",
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOptions {
    pub scope: PlanScope,
    /// Print one line per operation (verbosity 2 and up).
    pub announce: bool,
    pub durability: Durability,
}

/// Counts of what an applied plan actually did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecReport {
    pub removed: usize,
    pub added: usize,
    pub updated: usize,
    pub bytes_copied: u64,
    pub dirs_pruned: usize,
    pub repaired_src: usize,
    pub repaired_dst: usize,
}

fn checkpoint() -> Result<()> {
    shutdown::ensure_running().map_err(|e| {
        warn!("Stop requested; aborting remaining operations");
        e.into()
    })
}

fn announce(enabled: bool, line: impl FnOnce() -> String) {
    if enabled {
        output::print_user(&line());
    }
}

/// Delete each file under `root`, then prune directories the deletion emptied.
/// Returns (files removed, directories pruned).
pub fn remove_files<'a, I>(files: I, root: &Path, announce_ops: bool) -> Result<(usize, usize)>
where
    I: IntoIterator<Item = &'a RelPath>,
{
    let (mut removed, mut pruned) = (0, 0);
    for rel in files {
        checkpoint()?;
        announce(announce_ops, || format!("Removing: {rel}"));
        let path = rel.to_path(root);
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "already gone");
            }
            Err(e) => return Err(io_error_with_help("remove file", &path)(e)),
        }
        if let Some(parent) = path.parent() {
            pruned += prune_upward(root, parent)
                .with_context(|| format!("prune after removing '{}'", path.display()))?;
        }
    }
    Ok((removed, pruned))
}

/// Copy each file from `from_root` to the same relative path under `to_root`.
/// Returns (files copied, bytes copied).
pub fn copy_files<'a, I>(
    files: I,
    from_root: &Path,
    to_root: &Path,
    opts: &ExecOptions,
) -> Result<(usize, u64)>
where
    I: IntoIterator<Item = &'a RelPath>,
{
    let (mut count, mut bytes) = (0, 0u64);
    for rel in files {
        checkpoint()?;
        announce(opts.announce, || format!("Copying: {rel}"));
        let src = rel.to_path(from_root);
        let dest = rel.to_path(to_root);
        bytes += copy_creating_parents(&src, &dest, opts.durability)
            .with_context(|| format!("copy '{}' -> '{}'", src.display(), dest.display()))?;
        count += 1;
    }
    Ok((count, bytes))
}

/// Remove each listed directory under `root` and any ancestors left empty.
pub fn prune_empty(dirs: &[RelPath], root: &Path, side: Side, announce_ops: bool) -> Result<usize> {
    let mut pruned = 0;
    // Deepest first so a parent is visited after its children are gone.
    for rel in dirs.iter().rev() {
        checkpoint()?;
        let dir = rel.to_path(root);
        if !dir.exists() {
            continue;
        }
        announce(announce_ops, || format!("Removing {side} empty dir: {rel}"));
        pruned += prune_upward(root, &dir)
            .with_context(|| format!("prune {side} directory '{}'", dir.display()))?;
    }
    Ok(pruned)
}

/// Copy timestamps and permissions from `from_root/<rel>` onto `to_root/<rel>`.
/// `side` names the root being repaired.
pub fn repair_metadata<'a, I>(
    files: I,
    from_root: &Path,
    to_root: &Path,
    side: Side,
    announce_ops: bool,
) -> Result<usize>
where
    I: IntoIterator<Item = &'a RelPath>,
{
    let mut count = 0;
    for rel in files {
        checkpoint()?;
        announce(announce_ops, || format!("Repairing {side} metadata {rel}"));
        let from = rel.to_path(from_root);
        let to = rel.to_path(to_root);
        copy_metadata(&from, &to)
            .with_context(|| format!("repair {side} metadata '{}'", to.display()))?;
        count += 1;
    }
    Ok(count)
}

fn bytes_to_copy(plan: &SyncPlan, src_root: &Path) -> Result<u64> {
    let mut total = 0u64;
    for rel in plan.changes.add.iter().chain(&plan.changes.update) {
        let path = rel.to_path(src_root);
        let meta = fs::metadata(&path).map_err(io_error_with_help("stat source", &path))?;
        total = total.saturating_add(meta.len());
    }
    Ok(total)
}

/// Apply `plan` to `roots`. Exclusions are needed again for the empty-directory
/// re-scan.
pub fn apply_plan(
    plan: &SyncPlan,
    roots: &SyncRoots,
    exclusions: &Exclusions,
    opts: &ExecOptions,
) -> Result<ExecReport> {
    let (src_root, dst_root) = (roots.source.as_path(), roots.destination.as_path());
    let changes = &plan.changes;
    let mut report = ExecReport::default();

    ensure_space_for_copy(dst_root, bytes_to_copy(plan, src_root)?)?;

    let (removed, pruned) = remove_files(&changes.remove, dst_root, opts.announce)?;
    report.removed = removed;
    report.dirs_pruned += pruned;

    let (added, bytes) = copy_files(&changes.add, src_root, dst_root, opts)?;
    report.added = added;
    report.bytes_copied += bytes;

    let (updated, bytes) = copy_files(&changes.update, src_root, dst_root, opts)?;
    report.updated = updated;
    report.bytes_copied += bytes;

    if opts.scope.empty_dirs {
        let src_empty = scan_empty_dirs(src_root, exclusions)?;
        let dst_empty = scan_empty_dirs(dst_root, exclusions)?;
        report.dirs_pruned += prune_empty(&src_empty, src_root, Side::Source, opts.announce)?;
        report.dirs_pruned += prune_empty(&dst_empty, dst_root, Side::Destination, opts.announce)?;
    }

    if opts.scope.metadata {
        report.repaired_src = repair_metadata(
            &changes.repair_src,
            dst_root,
            src_root,
            Side::Source,
            opts.announce,
        )?;
        report.repaired_dst = repair_metadata(
            &changes.repair_dst,
            src_root,
            dst_root,
            Side::Destination,
            opts.announce,
        )?;
    }

    info!(
        removed = report.removed,
        added = report.added,
        updated = report.updated,
        bytes = report.bytes_copied,
        pruned = report.dirs_pruned,
        repaired_src = report.repaired_src,
        repaired_dst = report.repaired_dst,
        "Plan applied"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Sha256Hasher;
    use crate::plan::build_plan;
    use filetime::{FileTime, set_file_mtime};
    use tempfile::tempdir;

    fn setup() -> (tempfile::TempDir, SyncRoots) {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        (td, SyncRoots::new(src, dst))
    }

    fn full_scope() -> ExecOptions {
        ExecOptions {
            scope: PlanScope {
                empty_dirs: true,
                metadata: true,
            },
            ..Default::default()
        }
    }

    #[test]
    fn removal_prunes_emptied_parents() {
        let (_td, r) = setup();
        fs::create_dir_all(r.destination.join("old/deep")).unwrap();
        fs::write(r.destination.join("old/deep/x.txt"), "x").unwrap();

        let files = [RelPath::new("old/deep/x.txt")];
        let (removed, pruned) = remove_files(&files, &r.destination, false).unwrap();
        assert_eq!((removed, pruned), (1, 2));
        assert!(r.destination.exists());
        assert!(!r.destination.join("old").exists());
    }

    #[test]
    fn apply_mirrors_source_and_prunes_both_sides() {
        let (_td, r) = setup();
        fs::create_dir_all(r.source.join("nested")).unwrap();
        fs::write(r.source.join("nested/new.txt"), "new").unwrap();
        fs::write(r.source.join("same.txt"), "same").unwrap();
        fs::write(r.destination.join("same.txt"), "different").unwrap();
        set_file_mtime(r.destination.join("same.txt"), FileTime::from_unix_time(1_000_000_000, 0)).unwrap();
        fs::write(r.destination.join("gone.txt"), "bye").unwrap();
        fs::create_dir_all(r.source.join("src_hollow/inner")).unwrap();
        fs::create_dir_all(r.destination.join("dst_hollow")).unwrap();

        let ex = Exclusions::default();
        let plan = build_plan(&r, &ex, &Sha256Hasher::default(), false).unwrap();
        let report = apply_plan(&plan, &r, &ex, &full_scope()).unwrap();

        assert_eq!((report.removed, report.added, report.updated), (1, 1, 1));
        assert_eq!(fs::read_to_string(r.destination.join("nested/new.txt")).unwrap(), "new");
        assert_eq!(fs::read_to_string(r.destination.join("same.txt")).unwrap(), "same");
        assert!(!r.destination.join("gone.txt").exists());
        assert!(!r.source.join("src_hollow").exists());
        assert!(!r.destination.join("dst_hollow").exists());
    }

    #[test]
    fn metadata_flows_from_newer_to_older() {
        let (_td, r) = setup();
        for root in [&r.source, &r.destination] {
            fs::write(root.join("c.txt"), "same").unwrap();
        }
        let older = FileTime::from_unix_time(1_000_000_000, 0);
        let newer = FileTime::from_unix_time(1_600_000_000, 0);
        set_file_mtime(r.source.join("c.txt"), older).unwrap();
        set_file_mtime(r.destination.join("c.txt"), newer).unwrap();

        let ex = Exclusions::default();
        let plan = build_plan(&r, &ex, &Sha256Hasher::default(), false).unwrap();
        assert_eq!(plan.changes.repair_src.len(), 1);
        let report = apply_plan(&plan, &r, &ex, &full_scope()).unwrap();
        assert_eq!(report.repaired_src, 1);

        let mt = FileTime::from_last_modification_time(&fs::metadata(r.source.join("c.txt")).unwrap());
        assert_eq!(mt, newer);
    }

    #[test]
    fn out_of_scope_work_is_left_alone() {
        let (_td, r) = setup();
        fs::create_dir_all(r.destination.join("hollow")).unwrap();

        let ex = Exclusions::default();
        let plan = build_plan(&r, &ex, &Sha256Hasher::default(), false).unwrap();
        apply_plan(&plan, &r, &ex, &ExecOptions::default()).unwrap();
        assert!(r.destination.join("hollow").exists());
    }
}
