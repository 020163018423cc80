//! Prefix exclusion.
//!
//! A path is excluded when its `/`-joined string starts with any exclusion entry.
//! Matching is a plain string prefix, not a path-segment match: `logs` excludes
//! `logs/today.txt` and also `logs2/x`. Use `logs/` to restrict to the directory.
//!
//! Filtering sorts both lists and does a single merge scan, O(n log n + m log m).

use super::relpath::RelPath;

/// Directory Windows keeps in every drive root; never synchronized.
pub const RECYCLE_BIN: &str = "$RECYCLE.BIN";

/// Separator used by the `--exclude` flag.
pub const LIST_SEPARATOR: char = '?';

/// Sorted, de-duplicated set of exclusion prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    prefixes: Vec<String>,
}

impl Exclusions {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::default();
        out.extend(entries);
        out
    }

    /// Parse a `?`-separated list; empty segments are dropped.
    pub fn parse_list(list: &str) -> Self {
        Self::new(list.split(LIST_SEPARATOR))
    }

    /// Add entries, normalizing `\` to `/` and dropping a leading `./`.
    pub fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for e in entries {
            let norm = e.as_ref().replace('\\', "/");
            let norm = norm.strip_prefix("./").unwrap_or(&norm).to_string();
            if !norm.is_empty() {
                self.prefixes.push(norm);
            }
        }
        self.prefixes.sort();
        self.prefixes.dedup();
    }

    /// Add the entries every run on this platform must skip.
    pub fn with_platform_defaults(mut self) -> Self {
        if cfg!(windows) {
            self.extend([RECYCLE_BIN]);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(String::as_str)
    }

    /// Single-path check; prefer `filter_excluded` for whole listings.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// Return the files not matched by any exclusion prefix, sorted.
pub fn filter_excluded(mut files: Vec<RelPath>, exclusions: &Exclusions) -> Vec<RelPath> {
    files.sort();
    let excl = &exclusions.prefixes;

    let mut kept = Vec::with_capacity(files.len());
    let mut ex_idx = 0;
    let mut iter = files.into_iter().peekable();

    while let Some(file) = iter.peek() {
        let Some(prefix) = excl.get(ex_idx) else {
            break;
        };
        if file.as_str() < prefix.as_str() {
            if let Some(f) = iter.next() {
                kept.push(f);
            }
        } else if file.as_str().starts_with(prefix.as_str()) {
            iter.next();
        } else {
            ex_idx += 1;
        }
    }
    kept.extend(iter);
    kept
}
