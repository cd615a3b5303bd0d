//! Path derivation for a compiled unit.
//!
//! - base name: final path segment with everything from the last `.`
//!   removed (`dir/foo.tar.gz` → `foo.tar`, `Makefile` → `Makefile`)
//! - ledger path: the unit's directory joined with the ledger file name,
//!   or the bare file name (current directory) when there is no directory
//!
//! A base name that would not decode back to itself from a ledger line
//! (leading whitespace, a leading comment marker, a field separator or a
//! line break) is rejected before the ledger is touched.

use std::path::{Path, PathBuf};

use identisaurus_ledger::{COMMENT_CHAR, FIELD_SEPARATOR};

use crate::error::{Result, StampError};

/// Final path segment of `source`, used as the human-readable name in the
/// version string.
pub fn display_name(source: &Path) -> Result<String> {
    source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| StampError::InvalidSourcePath(source.to_path_buf()))
}

/// Base name under which `source` is counted in the ledger.
pub fn base_name(source: &Path) -> Result<String> {
    let name = display_name(source)?;
    let stem = match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name.as_str(),
    };
    if stem.is_empty() {
        return Err(StampError::EmptyBaseName(source.to_path_buf()));
    }
    if let Some(reason) = unstorable_reason(stem) {
        return Err(StampError::UnsafeBaseName {
            path: source.to_path_buf(),
            name: stem.to_string(),
            reason,
        });
    }
    Ok(stem.to_string())
}

fn unstorable_reason(stem: &str) -> Option<&'static str> {
    if stem.starts_with(char::is_whitespace) {
        Some("starts with whitespace")
    } else if stem.starts_with(COMMENT_CHAR) {
        Some("starts with the ledger comment marker '#'")
    } else if stem.contains(FIELD_SEPARATOR) {
        Some("contains the ledger field separator ','")
    } else if stem.contains(['\n', '\r']) {
        Some("contains a line break")
    } else {
        None
    }
}

/// Ledger file co-located with `source`.
pub fn ledger_path(source: &Path, ledger_file_name: &str) -> PathBuf {
    match source.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(ledger_file_name),
        _ => PathBuf::from(ledger_file_name),
    }
}
