//! In-memory embedder for tests and for callers that handle the bytes
//! themselves (for example a `build.rs` that formats its own output).

use tracing::debug;

use crate::error::Result;
use crate::symbol::validate_symbol;
use crate::traits::Embedder;

/// One recorded embedding request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Embedded {
    pub symbol: String,
    pub bytes: Vec<u8>,
}

/// Records every request; data is lost when the embedder is dropped.
#[derive(Clone, Debug, Default)]
pub struct MemoryEmbedder {
    items: Vec<Embedded>,
}

impl MemoryEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Embedded] {
        &self.items
    }

    /// The most recent request, if any.
    pub fn last(&self) -> Option<&Embedded> {
        self.items.last()
    }
}

impl Embedder for MemoryEmbedder {
    fn embed(&mut self, symbol: &str, bytes: &[u8]) -> Result<()> {
        validate_symbol(symbol)?;
        debug!(symbol, len = bytes.len(), "recorded embed request");
        self.items.push(Embedded {
            symbol: symbol.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}
