//! Embedding facilities for Identisaurus.
//!
//! An [`Embedder`] takes a byte string and a symbol name and makes sure the
//! bytes end up as a read-only static that survives linking, even though
//! nothing references it. How that happens depends on the facility:
//!
//! - [`RustSourceEmbedder`] -- generates a `#[used]` static for `include!`
//! - [`CSourceEmbedder`] -- generates a C unit with `__attribute__((used))`
//! - [`RawEmbedder`] -- writes the bare bytes (e.g. for `objcopy --add-section`)
//! - [`MemoryEmbedder`] -- records requests in memory for tests and embedding

pub mod error;
pub mod memory;
pub mod raw;
pub mod source;
pub mod symbol;
pub mod traits;

pub use error::{EmbedError, Result};
pub use memory::{Embedded, MemoryEmbedder};
pub use raw::{RawEmbedder, RawTarget};
pub use source::{render_c, render_rust, CSourceEmbedder, RustSourceEmbedder};
pub use symbol::{validate_symbol, DEFAULT_SYMBOL};
pub use traits::Embedder;
