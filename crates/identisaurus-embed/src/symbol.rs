//! Symbol name validation.
//!
//! A symbol must be a plain identifier accepted by both C and Rust:
//! - must be non-empty and not a lone `_`
//! - first character is an ASCII letter or `_`
//! - remaining characters are ASCII letters, digits, or `_`
//! - not a Rust or C keyword, since the name is pasted verbatim into
//!   generated source

use crate::error::{EmbedError, Result};

/// Symbol used when none is configured.
pub const DEFAULT_SYMBOL: &str = "__identisaurus";

/// Strict and reserved Rust keywords, 2021 edition.
const RUST_KEYWORDS: &[&str] = &[
    "Self", "abstract", "as", "async", "await", "become", "box", "break", "const", "continue",
    "crate", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// C11 keywords.
const C_KEYWORDS: &[&str] = &[
    "_Alignas", "_Alignof", "_Atomic", "_Bool", "_Complex", "_Generic", "_Imaginary",
    "_Noreturn", "_Static_assert", "_Thread_local", "auto", "break", "case", "char", "const",
    "continue", "default", "do", "double", "else", "enum", "extern", "float", "for", "goto", "if",
    "inline", "int", "long", "register", "restrict", "return", "short", "signed", "sizeof",
    "static", "struct", "switch", "typedef", "union", "unsigned", "void", "volatile", "while",
];

/// Validate a symbol name, returning `Ok(())` if valid.
///
/// ```
/// use identisaurus_embed::validate_symbol;
///
/// assert!(validate_symbol("__identisaurus").is_ok());
/// assert!(validate_symbol("9lives").is_err());
/// ```
pub fn validate_symbol(name: &str) -> Result<()> {
    let invalid = |reason: &str| EmbedError::InvalidSymbol {
        name: name.to_string(),
        reason: reason.into(),
    };

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("symbol must not be empty"));
    };
    if name == "_" {
        return Err(invalid("symbol must not be a lone '_'"));
    }
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(invalid("must start with an ASCII letter or '_'"));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(invalid(&format!("contains forbidden character: {bad:?}")));
    }
    if RUST_KEYWORDS.contains(&name) {
        return Err(invalid("is a Rust keyword"));
    }
    if C_KEYWORDS.contains(&name) {
        return Err(invalid("is a C keyword"));
    }
    Ok(())
}
