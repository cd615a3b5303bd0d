//! Build-count ledger for Identisaurus.
//!
//! The ledger is a flat text file (by default `.identisaurus.rawr`) living next
//! to the sources it counts. Each non-comment line records how many times an
//! artifact has been stamped:
//!
//! ```text
//! # comments start with '#', blank lines are ignored
//! main, 12
//! parser, 3
//! ```
//!
//! # Modules
//!
//! - [`record`] -- [`LedgerRecord`] and the ordered [`Ledger`] collection
//! - [`codec`] -- pure text decoding/encoding of the ledger format
//! - [`file`] -- [`LedgerFile`]: load/save against the filesystem
//! - [`lock`] -- opt-in advisory [`LedgerLock`] around a load/save pair
//! - [`error`] -- [`LedgerError`] and the crate `Result` alias
//!
//! Comments and formatting are not preserved: every save rewrites the file
//! from the in-memory records. Counts are never checked for monotonicity, so
//! users are free to edit the file by hand.

pub mod codec;
pub mod error;
pub mod file;
pub mod lock;
pub mod record;

pub use codec::{decode, encode, DecodeError, DecodeErrorKind, COMMENT_CHAR, FIELD_SEPARATOR};
pub use error::{LedgerError, Result};
pub use file::{LedgerFile, SaveMode};
pub use lock::{LedgerLock, LockConfig};
pub use record::{Ledger, LedgerRecord};
