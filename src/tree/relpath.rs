//! Root-relative path type.
//! Paths are stored as `/`-joined strings regardless of the host separator so that
//! ordering, prefix exclusion and reporting behave identically on every platform.

use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

/// A file or directory location relative to a synchronization root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelPath(String);

impl RelPath {
    /// Build from a string, converting `\` separators and trimming surrounding `/`.
    pub fn new(s: impl AsRef<str>) -> Self {
        let normalized = s.as_ref().replace('\\', "/");
        Self(normalized.trim_matches('/').to_string())
    }

    /// Child of this path: `parent/name`, or just `name` at the root.
    pub fn join(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}/{}", self.0, name))
        }
    }

    /// Parent path, `None` for entries directly under the root.
    pub fn parent(&self) -> Option<Self> {
        self.0.rfind('/').map(|idx| Self(self.0[..idx].to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Physical location of this entry under `root`.
    pub fn to_path(&self, root: &Path) -> PathBuf {
        let mut p = root.to_path_buf();
        for seg in self.0.split('/').filter(|s| !s.is_empty()) {
            p.push(seg);
        }
        p
    }

    /// Derive a relative path from a physical path under `root`.
    /// Returns `None` when `path` is not inside `root` or is not valid UTF-8.
    pub fn from_path(root: &Path, path: &Path) -> Option<Self> {
        let rel = path.strip_prefix(root).ok()?;
        let mut out = Self(String::new());
        for comp in rel.components() {
            out = out.join(comp.as_os_str().to_str()?);
        }
        Some(out)
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RelPath {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RelPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RelPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
