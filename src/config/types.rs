//! Core configuration types.
//! - Config holds one run's settings; CLI flags are applied on top of XML values.
//! - LogLevel represents diagnostic log verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::diff::DEFAULT_CHUNK_SIZE;
use crate::fs_ops::Durability;
use crate::plan::PlanScope;
use crate::tree::Exclusions;

/// Program-defined log levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// Per-file decisions
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        })
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Settings for one synchronization run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Tree whose content wins
    pub source: PathBuf,
    /// Tree made to mirror the source
    pub destination: PathBuf,
    /// Perform the plan instead of only reporting it
    pub apply: bool,
    /// Skip the confirmation prompt
    pub force: bool,
    /// Include empty-directory pruning
    pub prune_empty: bool,
    /// Include metadata repair of identical files
    pub repair_metadata: bool,
    /// Console report verbosity as requested (see `effective_verbosity`)
    pub verbosity: u8,
    /// Prefixes excluded from both trees
    pub exclude: Exclusions,
    /// Diagnostic log level
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Read size used when hashing
    pub hash_chunk_bytes: usize,
    /// Classify shared files on the rayon pool
    pub parallel: bool,
    /// fsync every copied file before it is renamed into place
    pub fsync: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: PathBuf::new(),
            destination: PathBuf::new(),
            apply: false,
            force: false,
            prune_empty: false,
            repair_metadata: false,
            verbosity: 1,
            exclude: Exclusions::default(),
            log_level: LogLevel::Normal,
            log_file: None,
            hash_chunk_bytes: DEFAULT_CHUNK_SIZE,
            parallel: true,
            fsync: false,
        }
    }
}

impl Config {
    /// Construct a Config for two roots; other fields use defaults.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            ..Default::default()
        }
    }

    /// A preview always reports at least at level 1.
    pub fn effective_verbosity(&self) -> u8 {
        if self.apply {
            self.verbosity
        } else {
            self.verbosity.max(1)
        }
    }

    pub fn scope(&self) -> PlanScope {
        PlanScope {
            empty_dirs: self.prune_empty,
            metadata: self.repair_metadata,
        }
    }

    pub fn durability(&self) -> Durability {
        if self.fsync {
            Durability::Full
        } else {
            Durability::Data
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_floors_verbosity_to_one() {
        let mut cfg = Config::new("a", "b");
        cfg.verbosity = 0;
        assert_eq!(cfg.effective_verbosity(), 1);
        cfg.apply = true;
        assert_eq!(cfg.effective_verbosity(), 0);
        cfg.verbosity = 3;
        assert_eq!(cfg.effective_verbosity(), 3);
    }

    #[test]
    fn fsync_selects_full_durability() {
        let mut cfg = Config::default();
        assert_eq!(cfg.durability(), Durability::Data);
        cfg.fsync = true;
        assert_eq!(cfg.durability(), Durability::Full);
    }
}
