//! Plan construction: enumerate both roots, drop excluded paths, classify.
//!
//! A `SyncPlan` is pure data. Building one never touches either tree beyond
//! reading it, so a preview run and an applied run see the same plan.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::SyncRoots;
use crate::diff::{ChangeSet, ContentHasher, calculate_differences_with};
use crate::tree::{Exclusions, RelPath, enumerate_tree, filter_excluded};

/// Which optional work a run includes besides content changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanScope {
    /// Prune directories that hold no files.
    pub empty_dirs: bool,
    /// Repair timestamps/permissions of identical files.
    pub metadata: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    pub changes: ChangeSet,
    /// Directories in the source with no files at any depth, after exclusion.
    pub source_empty_dirs: Vec<RelPath>,
    /// Same for the destination.
    pub dest_empty_dirs: Vec<RelPath>,
    /// Unreadable directories and symlink loops on either side.
    pub skipped: Vec<PathBuf>,
}

impl SyncPlan {
    /// Number of file operations the run would perform under `scope`.
    /// Empty directories are not counted: when nothing else is pending the run is
    /// up to date and leaves both trees untouched, even with `empty_dirs` set.
    pub fn pending(&self, scope: PlanScope) -> usize {
        let mut n = self.changes.content_changes();
        if scope.metadata {
            n += self.changes.metadata_repairs();
        }
        n
    }

    pub fn is_up_to_date(&self, scope: PlanScope) -> bool {
        self.pending(scope) == 0
    }
}

/// Empty directories under `root` that are not excluded.
pub fn scan_empty_dirs(root: &Path, exclusions: &Exclusions) -> Result<Vec<RelPath>> {
    let listing = enumerate_tree(root)?;
    Ok(filter_excluded(listing.empty_dirs, exclusions))
}

/// Build the plan for `roots`, hashing with `hasher`.
pub fn build_plan(
    roots: &SyncRoots,
    exclusions: &Exclusions,
    hasher: &dyn ContentHasher,
    parallel: bool,
) -> Result<SyncPlan> {
    let src = enumerate_tree(&roots.source)?;
    let dst = enumerate_tree(&roots.destination)?;
    debug!(
        src_files = src.files.len(),
        dst_files = dst.files.len(),
        exclusions = exclusions.len(),
        "Enumerated both roots"
    );

    let src_files = filter_excluded(src.files, exclusions);
    let dst_files = filter_excluded(dst.files, exclusions);

    let changes = calculate_differences_with(
        &src_files,
        &dst_files,
        &roots.source,
        &roots.destination,
        hasher,
        parallel,
    )?;

    let mut skipped = src.skipped;
    skipped.extend(dst.skipped);

    let plan = SyncPlan {
        changes,
        source_empty_dirs: filter_excluded(src.empty_dirs, exclusions),
        dest_empty_dirs: filter_excluded(dst.empty_dirs, exclusions),
        skipped,
    };
    info!(
        add = plan.changes.add.len(),
        update = plan.changes.update.len(),
        remove = plan.changes.remove.len(),
        repairs = plan.changes.metadata_repairs(),
        empty_dirs = plan.source_empty_dirs.len() + plan.dest_empty_dirs.len(),
        "Sync plan computed"
    );
    Ok(plan)
}
