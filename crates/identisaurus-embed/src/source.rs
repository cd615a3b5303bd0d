//! Source-generating embedders.
//!
//! Both write a small translation unit that the host build then compiles
//! into the artifact. The Rust flavour is meant to be pulled in with
//! `include!(concat!(env!("OUT_DIR"), "/identisaurus.rs"))` from a build
//! script's output directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{EmbedError, Result};
use crate::symbol::validate_symbol;
use crate::traits::Embedder;

/// Render a Rust item declaring `bytes` as a retained static byte array.
pub fn render_rust(symbol: &str, bytes: &[u8]) -> String {
    let literal: String = bytes
        .iter()
        .flat_map(|b| std::ascii::escape_default(*b))
        .map(char::from)
        .collect();
    format!(
        "// @generated by identisaurus; do not edit.\n\
         #[used]\n\
         #[allow(non_upper_case_globals, dead_code)]\n\
         pub static {symbol}: [u8; {len}] = *b\"{literal}\";\n",
        len = bytes.len(),
    )
}

/// Render a C translation unit declaring `bytes` as a retained static
/// string. Non-printable bytes become three-digit octal escapes.
pub fn render_c(symbol: &str, bytes: &[u8]) -> String {
    let mut literal = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => literal.push_str("\\\\"),
            b'"' => literal.push_str("\\\""),
            // Avoid accidental trigraphs.
            b'?' => literal.push_str("\\?"),
            b'\n' => literal.push_str("\\n"),
            0x20..=0x7e => literal.push(char::from(b)),
            _ => literal.push_str(&format!("\\{b:03o}")),
        }
    }
    format!(
        "/* Generated by identisaurus; do not edit. */\n\
         __attribute__((used)) static const char {symbol}[] = \"{literal}\";\n"
    )
}

fn write_source(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|source| EmbedError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a Rust source file containing the embedded static.
#[derive(Clone, Debug)]
pub struct RustSourceEmbedder {
    path: PathBuf,
}

impl RustSourceEmbedder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Embedder for RustSourceEmbedder {
    fn embed(&mut self, symbol: &str, bytes: &[u8]) -> Result<()> {
        validate_symbol(symbol)?;
        write_source(&self.path, &render_rust(symbol, bytes))?;
        debug!(symbol, path = %self.path.display(), "wrote Rust embed source");
        Ok(())
    }
}

/// Writes a C source file containing the embedded static.
#[derive(Clone, Debug)]
pub struct CSourceEmbedder {
    path: PathBuf,
}

impl CSourceEmbedder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Embedder for CSourceEmbedder {
    fn embed(&mut self, symbol: &str, bytes: &[u8]) -> Result<()> {
        validate_symbol(symbol)?;
        write_source(&self.path, &render_c(symbol, bytes))?;
        debug!(symbol, path = %self.path.display(), "wrote C embed source");
        Ok(())
    }
}
