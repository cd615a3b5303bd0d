//! Counter update engine for Identisaurus.
//!
//! Operates purely on an in-memory [`Ledger`]: nothing here touches the
//! filesystem and nothing here can fail.
//!
//! - [`engine`] -- record lookup ([`MatchMode`]), increment, and read-back
//! - [`version`] -- the `<tag>source:Build N at T</tag>` [`VersionString`]
//!
//! [`Ledger`]: identisaurus_ledger::Ledger

pub mod engine;
pub mod version;

pub use engine::{current_count, find_record, increment, CounterEngine, MatchMode};
pub use version::{compose_version_string, VersionString, DEFAULT_TAG};
