//! Differ: classifies two filtered file listings into a `ChangeSet`.
//!
//! For paths present on both sides the modification times are compared first; only
//! when they differ are both files hashed. Equal hashes mean the content is the same
//! and only metadata drifted, so the side with the older timestamp is scheduled for
//! a metadata repair from the newer one. Different hashes mean an update (source wins).

pub mod hash;

use anyhow::{Context, Result};
use filetime::FileTime;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

use crate::shutdown;
use crate::tree::RelPath;
pub use hash::{ContentHasher, Sha256Hasher, DEFAULT_CHUNK_SIZE};

/// Five disjoint groups of paths produced by the differ.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    /// In source only; copy to destination.
    pub add: BTreeSet<RelPath>,
    /// In both, content differs; overwrite destination.
    pub update: BTreeSet<RelPath>,
    /// In destination only; delete.
    pub remove: BTreeSet<RelPath>,
    /// Identical content, source is older; copy destination metadata onto source.
    pub repair_src: BTreeSet<RelPath>,
    /// Identical content, destination is older; copy source metadata onto destination.
    pub repair_dst: BTreeSet<RelPath>,
}

impl ChangeSet {
    /// Number of add + update + remove entries.
    pub fn content_changes(&self) -> usize {
        self.add.len() + self.update.len() + self.remove.len()
    }

    pub fn metadata_repairs(&self) -> usize {
        self.repair_src.len() + self.repair_dst.len()
    }
}

/// Outcome for one path present on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Unchanged,
    Update,
    RepairSrc,
    RepairDst,
}

/// Compare two listings with the default SHA-256 hasher, classifying in parallel.
pub fn calculate_differences(
    src_files: &[RelPath],
    dst_files: &[RelPath],
    src_root: &Path,
    dst_root: &Path,
) -> Result<ChangeSet> {
    calculate_differences_with(src_files, dst_files, src_root, dst_root, &Sha256Hasher::default(), true)
}

/// Compare two listings using `hasher`. `parallel` spreads classification of the
/// shared paths over the rayon pool; the result is identical either way.
pub fn calculate_differences_with<H>(
    src_files: &[RelPath],
    dst_files: &[RelPath],
    src_root: &Path,
    dst_root: &Path,
    hasher: &H,
    parallel: bool,
) -> Result<ChangeSet>
where
    H: ContentHasher + ?Sized,
{
    let src: HashSet<&RelPath> = src_files.iter().collect();
    let dst: HashSet<&RelPath> = dst_files.iter().collect();

    let mut changes = ChangeSet {
        add: src.difference(&dst).map(|r| (*r).clone()).collect(),
        remove: dst.difference(&src).map(|r| (*r).clone()).collect(),
        ..ChangeSet::default()
    };

    let shared: Vec<&RelPath> = src.intersection(&dst).copied().collect();
    let judge = |rel: &&RelPath| -> Result<(RelPath, Verdict)> {
        let verdict = classify(rel, src_root, dst_root, hasher)?;
        Ok(((*rel).clone(), verdict))
    };
    let verdicts: Vec<(RelPath, Verdict)> = if parallel {
        shared.par_iter().map(judge).collect::<Result<_>>()?
    } else {
        shared.iter().map(judge).collect::<Result<_>>()?
    };

    for (rel, verdict) in verdicts {
        match verdict {
            Verdict::Unchanged => {}
            Verdict::Update => {
                changes.update.insert(rel);
            }
            Verdict::RepairSrc => {
                changes.repair_src.insert(rel);
            }
            Verdict::RepairDst => {
                changes.repair_dst.insert(rel);
            }
        }
    }

    debug!(
        add = changes.add.len(),
        update = changes.update.len(),
        remove = changes.remove.len(),
        repair_src = changes.repair_src.len(),
        repair_dst = changes.repair_dst.len(),
        shared = shared.len(),
        "computed differences"
    );
    Ok(changes)
}

fn modified(path: &Path) -> Result<FileTime> {
    let meta = fs::metadata(path).with_context(|| format!("stat '{}'", path.display()))?;
    Ok(FileTime::from_last_modification_time(&meta))
}

fn classify<H>(rel: &RelPath, src_root: &Path, dst_root: &Path, hasher: &H) -> Result<Verdict>
where
    H: ContentHasher + ?Sized,
{
    shutdown::ensure_running()?;
    let src_path = rel.to_path(src_root);
    let dst_path = rel.to_path(dst_root);

    let src_time = modified(&src_path)?;
    let dst_time = modified(&dst_path)?;
    if src_time == dst_time {
        return Ok(Verdict::Unchanged);
    }

    let src_digest = hasher
        .digest(&src_path)
        .with_context(|| format!("hash '{}'", src_path.display()))?;
    let dst_digest = hasher
        .digest(&dst_path)
        .with_context(|| format!("hash '{}'", dst_path.display()))?;

    let verdict = if src_digest != dst_digest {
        Verdict::Update
    } else if src_time < dst_time {
        Verdict::RepairSrc
    } else {
        Verdict::RepairDst
    };
    trace!(path = %rel, ?verdict, "classified shared file");
    Ok(verdict)
}
