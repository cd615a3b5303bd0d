use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::error::{EmbedError, Result};
use crate::symbol::validate_symbol;
use crate::traits::Embedder;

/// Where a [`RawEmbedder`] sends its bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawTarget {
    /// Overwrite this file with the bytes.
    File(PathBuf),
    /// Write the bytes to standard output.
    Stdout,
}

/// Emits the bare bytes with no wrapping.
///
/// Retention is the caller's job here, typically
/// `objcopy --add-section .identisaurus=<file>` or an assembler `.incbin`.
/// The symbol is validated and logged but does not appear in the output.
#[derive(Clone, Debug)]
pub struct RawEmbedder {
    target: RawTarget,
}

impl RawEmbedder {
    pub fn new(target: RawTarget) -> Self {
        Self { target }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self::new(RawTarget::File(path.into()))
    }

    pub fn stdout() -> Self {
        Self::new(RawTarget::Stdout)
    }

    pub fn target(&self) -> &RawTarget {
        &self.target
    }
}

impl Embedder for RawEmbedder {
    fn embed(&mut self, symbol: &str, bytes: &[u8]) -> Result<()> {
        validate_symbol(symbol)?;
        match &self.target {
            RawTarget::File(path) => {
                fs::write(path, bytes).map_err(|source| EmbedError::Write {
                    path: path.clone(),
                    source,
                })?;
            }
            RawTarget::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(bytes).map_err(EmbedError::Stdout)?;
                out.flush().map_err(EmbedError::Stdout)?;
            }
        }
        debug!(symbol, target = ?self.target, len = bytes.len(), "wrote raw embed bytes");
        Ok(())
    }
}
