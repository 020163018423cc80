//! Configuration: run settings, the optional XML file, and root validation.

pub mod paths;
pub mod types;
mod validate;
pub mod xml;

pub use paths::{CONFIG_ENV, default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel};
pub use validate::{SyncRoots, validate_roots};
pub use xml::{load_config, load_config_from_xml_path};
