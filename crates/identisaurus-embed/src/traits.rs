use crate::error::Result;

/// Places a byte string into a compiled artifact's static data.
///
/// Implementations must guarantee that, once the artifact is built, `bytes`
/// are present verbatim as a read-only static named `symbol` which is kept
/// by the linker even when unreferenced.
pub trait Embedder {
    fn embed(&mut self, symbol: &str, bytes: &[u8]) -> Result<()>;
}

impl<E: Embedder + ?Sized> Embedder for &mut E {
    fn embed(&mut self, symbol: &str, bytes: &[u8]) -> Result<()> {
        (**self).embed(symbol, bytes)
    }
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed(&mut self, symbol: &str, bytes: &[u8]) -> Result<()> {
        (**self).embed(symbol, bytes)
    }
}
