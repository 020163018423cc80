//! XML configuration support.
//! - Loads optional settings from config.xml (quick_xml + serde).
//! - A missing file is not an error; the run simply uses defaults.
//!
//! Notes:
//! - Only ambient settings live here (logging, exclusions, hashing). Roots and
//!   behavior switches always come from the command line.
//! - Unknown XML fields are rejected so typos surface instead of being ignored.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
    /// Repeated `<exclude>` elements, one prefix each
    #[serde(rename = "exclude", default)]
    exclude: Vec<String>,
    #[serde(rename = "hash_chunk_bytes", default, deserialize_with = "de_u64_trimmed_opt")]
    hash_chunk_bytes: Option<u64>,
    #[serde(rename = "parallel")]
    parallel: Option<bool>,
    #[serde(rename = "fsync")]
    fsync: Option<bool>,
}

// Custom deserializer that trims surrounding whitespace for optional u64
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| s.trim().parse::<u64>().ok()))
}

/// Parse `path` and layer its values over `Config::default()`.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&content)
        .with_context(|| format!("parse config file {}", path.display()))?;

    let mut cfg = Config::default();
    if let Some(raw) = parsed.log_level.as_deref() {
        cfg.log_level = raw
            .parse::<LogLevel>()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("in {}", path.display()))?;
    }
    cfg.log_file = parsed.log_file.as_deref().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    });
    cfg.exclude.extend(parsed.exclude.iter().map(|s| s.trim()));
    if let Some(n) = parsed.hash_chunk_bytes.filter(|n| *n > 0) {
        cfg.hash_chunk_bytes = usize::try_from(n).unwrap_or(usize::MAX);
    }
    if let Some(p) = parsed.parallel {
        cfg.parallel = p;
    }
    if let Some(f) = parsed.fsync {
        cfg.fsync = f;
    }

    debug!(
        path = %path.display(),
        excludes = cfg.exclude.len(),
        "Loaded config file"
    );
    Ok(cfg)
}

/// Load the config file from the default location.
/// Returns `Ok(None)` when no file exists there.
pub fn load_config() -> Result<Option<Config>> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!(path = %path.display(), "No config file; using defaults");
        return Ok(None);
    }
    load_config_from_xml_path(&path).map(Some)
}
