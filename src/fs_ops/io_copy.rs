//! Streaming copy into a freshly created file.
//!
//! - The destination is opened with `create_new(true)`, so an existing file is never clobbered.
//! - Buffered I/O with 1 MiB buffers to reduce syscall count.
//! - `Durability::Full` fsyncs the written file before returning.
//!
//! Snapshot semantics: the source is read once from start to EOF; bytes appended
//! concurrently are not included.

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

const BUF_SIZE: usize = 1024 * 1024;

/// Post-write flush behavior.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Durability {
    /// Data reaches the OS page cache only.
    #[default]
    Data,
    /// Data and metadata forced to stable storage (`sync_all`).
    Full,
}

/// Copy `src` -> `dst` and return the number of bytes written.
pub(super) fn copy_streaming(src: &Path, dst: &Path, mode: Durability) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;

    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;

    if mode == Durability::Full {
        writer.get_ref().sync_all()?;
    }
    Ok(bytes)
}
