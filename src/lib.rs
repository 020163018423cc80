//! Core library for `synchronize`.
//!
//! One-way directory synchronization: enumerate a source and a destination tree,
//! drop excluded paths, classify every relative path (add / update / remove /
//! metadata repair), and optionally apply the resulting plan so the destination
//! mirrors the source.
//!
//! The binary is a thin layer over `plan::build_plan` and `executor::apply_plan`.

pub mod cli;
pub mod config;
pub mod diff;
pub mod errors;
pub mod executor;
pub mod fs_ops;
pub mod output;
pub mod plan;
pub mod platform;
pub mod prompt;
pub mod report;
pub mod shutdown;
pub mod tree;

pub use config::{
    Config, LogLevel, SyncRoots, default_config_path, path_has_symlink_ancestor, validate_roots,
};
pub use diff::{ChangeSet, ContentHasher, Sha256Hasher, calculate_differences, calculate_differences_with};
pub use errors::SyncError;
pub use executor::{ExecOptions, ExecReport, apply_plan};
pub use plan::{PlanScope, SyncPlan, build_plan};
pub use tree::{Exclusions, RelPath, TreeListing, enumerate_tree, filter_excluded};
