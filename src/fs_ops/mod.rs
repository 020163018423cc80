//! Filesystem primitives used by the executor: safe copy, metadata transfer,
//! empty-directory pruning and a free-space preflight.

mod atomic;
mod copy;
mod helpers;
mod io_copy;
mod metadata;
mod prune;
mod space;
mod util;

pub use copy::{copy_creating_parents, copy_with_metadata};
pub use helpers::{io_error_with_help, io_error_with_help_io};
pub use io_copy::Durability;
pub use metadata::{apply_metadata, copy_metadata};
pub use prune::prune_upward;
pub use space::ensure_space_for_copy;
