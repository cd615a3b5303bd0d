//! Opt-in advisory locking for a ledger shared by parallel builds.
//!
//! The lock is a sidecar file named `<ledger>.lock`, created with
//! `create_new` so only one process can hold it. It is removed when the
//! [`LedgerLock`] guard is dropped. Processes that do not take the lock are
//! not excluded; without locking, two concurrent load/save pairs on the same
//! ledger can lose an update.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LedgerError, Result};

/// Suffix appended to the ledger path to form the lock path.
pub const LOCK_SUFFIX: &str = ".lock";

/// Timing for [`LedgerLock::acquire`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Give up after waiting this long (milliseconds).
    pub timeout_ms: u64,
    /// Delay between attempts (milliseconds).
    pub poll_ms: u64,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            poll_ms: 50,
        }
    }
}

/// Guard for an exclusively created `<ledger>.lock` file.
#[derive(Debug)]
pub struct LedgerLock {
    path: PathBuf,
}

impl LedgerLock {
    /// Path of the lock file guarding `ledger`.
    pub fn lock_path_for(ledger: &Path) -> PathBuf {
        let mut raw = ledger.as_os_str().to_owned();
        raw.push(LOCK_SUFFIX);
        PathBuf::from(raw)
    }

    /// Block until the lock for `ledger` is acquired or the timeout expires.
    pub fn acquire(ledger: &Path, config: &LockConfig) -> Result<Self> {
        let path = Self::lock_path_for(ledger);
        let timeout = Duration::from_millis(config.timeout_ms);
        let poll = Duration::from_millis(config.poll_ms);
        let started = Instant::now();
        let mut contended = false;

        loop {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let lock = Self { path };
                    // Owner pid is informational only.
                    writeln!(file, "{}", std::process::id()).map_err(|source| {
                        LedgerError::Lock {
                            path: lock.path.clone(),
                            source,
                        }
                    })?;
                    debug!(path = %lock.path.display(), waited = ?started.elapsed(), "ledger lock acquired");
                    return Ok(lock);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(LedgerError::LockTimeout { path, waited });
                    }
                    if !contended {
                        warn!(path = %path.display(), "ledger lock is held by another build; waiting");
                        contended = true;
                    }
                    thread::sleep(poll);
                }
                Err(source) => return Err(LedgerError::Lock { path, source }),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "ledger lock released"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove ledger lock"),
        }
    }
}
