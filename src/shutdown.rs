//! Process-wide interruption flag.
//! Set by the Ctrl-C handler. Enumeration and hashing check it per entry, and the
//! executor checks it before every operation, so an interrupted run stops between
//! files instead of in the middle of one.
//!
//! Relaxed atomics are sufficient for a one-way "stop" flag.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::SyncError;

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Request a cooperative stop (idempotent; safe to call from a signal handler).
#[inline]
pub fn request() {
    SHUTDOWN.store(true, Ordering::Relaxed);
}

#[inline]
pub fn is_requested() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// `Err(SyncError::Interrupted)` once a stop has been requested.
#[inline]
pub fn ensure_running() -> Result<(), SyncError> {
    if is_requested() {
        return Err(SyncError::Interrupted);
    }
    Ok(())
}
