//! Content hashing used to tell touched-but-identical files from real edits.
//!
//! Change detection only; digests never cross a trust boundary.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Files are streamed through the hasher in chunks of this many bytes.
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024 * 1024;

const PREFIX: &str = "sha256:";

/// Source of content digests. Implementations must be shareable across threads
/// because classification may run on the rayon pool.
pub trait ContentHasher: Sync {
    fn digest(&self, path: &Path) -> io::Result<String>;
}

/// Streaming SHA-256 hasher producing `sha256:<hex>`.
#[derive(Debug, Clone, Copy)]
pub struct Sha256Hasher {
    chunk_size: usize,
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE }
    }
}

impl Sha256Hasher {
    /// A zero chunk size falls back to the default.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        if chunk_size == 0 {
            Self::default()
        } else {
            Self { chunk_size }
        }
    }

    /// Read buffer for a file of `file_len` bytes: never larger than the file,
    /// never larger than the chunk size, and at least one byte.
    fn buffer_len(&self, file_len: u64) -> usize {
        usize::try_from(file_len)
            .unwrap_or(usize::MAX)
            .clamp(1, self.chunk_size)
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl ContentHasher for Sha256Hasher {
    fn digest(&self, path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut buf = vec![0u8; self.buffer_len(file.metadata()?.len())];
        let mut hasher = Sha256::new();
        loop {
            match file.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => hasher.update(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
    }
}
