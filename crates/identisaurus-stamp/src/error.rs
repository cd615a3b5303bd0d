use std::path::PathBuf;

use thiserror::Error;

/// Errors from a stamping run. Any of them aborts the unit's build step.
#[derive(Debug, Error)]
pub enum StampError {
    /// The source path has no final file name segment.
    #[error("source path '{}' does not name a file", .0.display())]
    InvalidSourcePath(PathBuf),

    /// Stripping the extension left nothing to count under.
    #[error("source '{}' has an empty base name", .0.display())]
    EmptyBaseName(PathBuf),

    /// The base name cannot be stored in a ledger line and read back as
    /// the same record.
    #[error("source '{}' has base name {:?} that the ledger cannot store: {}", .path.display(), .name, .reason)]
    UnsafeBaseName {
        path: PathBuf,
        name: String,
        reason: &'static str,
    },

    /// Configuration file or values are unusable.
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Ledger(#[from] identisaurus_ledger::LedgerError),

    #[error("embedding failed: {0}")]
    Embed(#[from] identisaurus_embed::EmbedError),
}

/// Convenience type alias for stamping operations.
pub type Result<T> = std::result::Result<T, StampError>;
