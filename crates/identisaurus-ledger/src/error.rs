//! Error types for ledger I/O and parsing.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::codec::DecodeErrorKind;

/// Errors produced while loading, saving, or locking a ledger file.
///
/// Every variant carries the path involved so the message can be surfaced
/// directly through a build tool's diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger could not be opened (or created) for reading.
    #[error("could not load ledger '{}': {}", .path.display(), .source)]
    Open { path: PathBuf, source: io::Error },

    /// The ledger was opened but its contents could not be read.
    #[error("could not read ledger '{}': {}", .path.display(), .source)]
    Read { path: PathBuf, source: io::Error },

    /// The ledger could not be opened or written for saving.
    #[error("could not open ledger '{}' to emit build counts: {}", .path.display(), .source)]
    Write { path: PathBuf, source: io::Error },

    /// A non-comment line is missing a name or a valid count.
    #[error("bad ledger entry at line {} of '{}': {}", .line, .path.display(), .kind)]
    Decode {
        path: PathBuf,
        line: usize,
        kind: DecodeErrorKind,
    },

    /// The temporary file could not be renamed over the ledger.
    #[error("could not replace ledger '{}': {}", .path.display(), .source)]
    Persist { path: PathBuf, source: io::Error },

    /// Another process held the lock for longer than the configured timeout.
    /// A build killed while holding it leaves the file behind.
    #[error(
        "timed out after {:?} waiting for ledger lock '{}'; if no other build is running, \
         the lock is stale and can be removed",
        .waited,
        .path.display()
    )]
    LockTimeout { path: PathBuf, waited: Duration },

    /// The lock file could not be created for a reason other than contention.
    #[error("could not create ledger lock '{}': {}", .path.display(), .source)]
    Lock { path: PathBuf, source: io::Error },
}

/// Convenience alias used throughout the ledger crate.
pub type Result<T> = std::result::Result<T, LedgerError>;
