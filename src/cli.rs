//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - `--exclude` takes a `?`-separated list of path prefixes relative to both roots.
//! - `--verbose` is a level, not a counter: `-v 2` prints headers, totals and one
//!   line per applied operation.

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel};
use crate::tree::Exclusions;

/// One-way directory synchronizer.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "synchronize",
    author,
    version,
    about = "Make a backup directory mirror its source (one-way)"
)]
pub struct Args {
    /// Source root; its content wins.
    #[arg(
        short = 's',
        long = "src",
        value_name = "DIR",
        value_hint = ValueHint::DirPath,
        required_unless_present = "print_config"
    )]
    pub src: Option<PathBuf>,

    /// Destination root; made to mirror the source.
    #[arg(
        short = 'd',
        long = "dst",
        value_name = "DIR",
        value_hint = ValueHint::DirPath,
        required_unless_present = "print_config"
    )]
    pub dst: Option<PathBuf>,

    /// Perform the changes (default is a preview listing).
    #[arg(short = 'a', long)]
    pub apply: bool,

    /// Apply without asking for confirmation.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Also prune directories that contain no files, on both sides.
    #[arg(short = 'e', long)]
    pub empty: bool,

    /// Also repair timestamps/permissions of identical files.
    #[arg(short = 'm', long)]
    pub meta: bool,

    /// Report verbosity (0 = quiet when applying, 1 = listing, 2 = diagnostics).
    #[arg(short = 'v', long, value_name = "LEVEL", default_value_t = 1)]
    pub verbose: u8,

    /// Path prefixes to ignore, separated by `?` (e.g. "logs?tmp/cache").
    #[arg(short = 'x', long, value_name = "LIST")]
    pub exclude: Option<String>,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file (appended).
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Classify shared files on a single thread.
    #[arg(long)]
    pub no_parallel: bool,

    /// fsync each copied file before renaming it into place.
    #[arg(long)]
    pub fsync: bool,

    /// Print where synchronize will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by synchronize and exit")]
    pub print_config: bool,
}

impl Args {
    /// Effective log level from `--log-level`. Errors on an unknown name.
    pub fn effective_log_level(&self) -> Result<Option<LogLevel>> {
        self.log_level
            .as_deref()
            .map(|s| s.parse::<LogLevel>().map_err(anyhow::Error::msg))
            .transpose()
            .context("invalid --log-level")
    }

    /// Apply CLI overrides to a loaded Config (in-place). Unset flags leave it alone;
    /// `--exclude` entries are merged with any configured ones.
    pub fn apply_overrides(&self, cfg: &mut Config) -> Result<()> {
        if let Some(src) = &self.src {
            cfg.source = src.clone();
        }
        if let Some(dst) = &self.dst {
            cfg.destination = dst.clone();
        }
        cfg.apply = self.apply;
        cfg.force = self.force;
        cfg.prune_empty = self.empty;
        cfg.repair_metadata = self.meta;
        cfg.verbosity = self.verbose;
        if let Some(list) = &self.exclude {
            let extra = Exclusions::parse_list(list);
            cfg.exclude.extend(extra.iter());
        }
        if let Some(level) = self.effective_log_level()? {
            cfg.log_level = level;
        }
        if let Some(lf) = &self.log_file {
            cfg.log_file = Some(lf.clone());
        }
        if self.no_parallel {
            cfg.parallel = false;
        }
        if self.fsync {
            cfg.fsync = true;
        }
        Ok(())
    }
}

pub fn parse() -> Args {
    Args::parse()
}
