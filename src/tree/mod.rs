//! File-tree inspection: relative paths, enumeration and prefix exclusion.

mod enumerate;
mod filter;
mod relpath;

pub use enumerate::{enumerate_tree, TreeListing};
pub use filter::{filter_excluded, Exclusions, LIST_SEPARATOR, RECYCLE_BIN};
pub use relpath::RelPath;
