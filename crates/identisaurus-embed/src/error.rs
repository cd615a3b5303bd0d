use std::io;
use std::path::PathBuf;

/// Errors produced by embedding facilities.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The symbol is not usable as a C/Rust identifier.
    #[error("invalid symbol {name:?}: {reason}")]
    InvalidSymbol { name: String, reason: String },

    /// The output file could not be written.
    #[error("could not write '{}': {}", .path.display(), .source)]
    Write { path: PathBuf, source: io::Error },

    /// Writing to stdout failed.
    #[error("could not write to stdout: {0}")]
    Stdout(#[source] io::Error),
}

/// Convenience type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbedError>;
