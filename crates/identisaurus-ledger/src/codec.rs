//! Text codec for the ledger format.
//!
//! Decoding rules, applied line by line:
//! - leading whitespace is stripped
//! - empty lines and lines starting with [`COMMENT_CHAR`] are skipped
//! - the line is split on [`FIELD_SEPARATOR`]; the first field is the name,
//!   the second (whitespace-trimmed) is a base-10 unsigned count
//! - anything after the second field is ignored
//!
//! Encoding writes `name, count\n` per record. Comments do not survive.

use crate::record::{Ledger, LedgerRecord};

/// Marks a comment line in the ledger.
pub const COMMENT_CHAR: char = '#';

/// Separates the name and count fields.
pub const FIELD_SEPARATOR: char = ',';

/// A malformed line, with its 1-based line number.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct DecodeError {
    pub line: usize,
    pub kind: DecodeErrorKind,
}

/// Why a ledger line was rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("missing artifact name")]
    MissingName,

    #[error("missing build count")]
    MissingCount,

    #[error("invalid build count {0:?}")]
    InvalidCount(String),
}

/// Decode a whole ledger. Stops at the first malformed line.
pub fn decode(input: &str) -> Result<Ledger, DecodeError> {
    let mut ledger = Ledger::new();
    for (index, raw) in input.lines().enumerate() {
        let record = decode_line(raw).map_err(|kind| DecodeError {
            line: index + 1,
            kind,
        })?;
        if let Some(record) = record {
            ledger.push(record);
        }
    }
    Ok(ledger)
}

/// Decode a single line. Returns `Ok(None)` for blank and comment lines.
pub fn decode_line(raw: &str) -> Result<Option<LedgerRecord>, DecodeErrorKind> {
    let line = raw.trim_start();
    if line.is_empty() || line.starts_with(COMMENT_CHAR) {
        return Ok(None);
    }

    let mut fields = line.split(FIELD_SEPARATOR);
    let name = fields.next().unwrap_or_default();
    if name.is_empty() {
        return Err(DecodeErrorKind::MissingName);
    }

    let count = fields
        .next()
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .ok_or(DecodeErrorKind::MissingCount)?;
    let build_count = count
        .parse::<u64>()
        .map_err(|_| DecodeErrorKind::InvalidCount(count.to_string()))?;

    Ok(Some(LedgerRecord::new(name, build_count)))
}

/// Encode a ledger as text, one `name, count` line per record.
pub fn encode(ledger: &Ledger) -> String {
    ledger
        .iter()
        .map(|record| format!("{}{} {}\n", record.name, FIELD_SEPARATOR, record.build_count))
        .collect()
}
