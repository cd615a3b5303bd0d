//! The identification string embedded into each stamped artifact.
//!
//! Format: `<tag>source:Build N at T</tag>\n`, where `N` is the
//! post-increment build count and `T` is seconds since the UNIX epoch.
//! Nothing in `source` is escaped.

use std::fmt;

use serde::Serialize;

/// Tag used when none is configured.
pub const DEFAULT_TAG: &str = "identisaurus";

/// A composed version string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct VersionString {
    pub tag: String,
    pub source: String,
    pub count: u64,
    pub timestamp: u64,
}

impl VersionString {
    pub fn new(tag: impl Into<String>, source: impl Into<String>, count: u64, timestamp: u64) -> Self {
        Self {
            tag: tag.into(),
            source: source.into(),
            count,
            timestamp,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Parse a single rendered string. The trailing newline is optional.
    pub fn parse(text: &str, tag: &str) -> Option<Self> {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        let body = text
            .trim_end_matches('\n')
            .strip_prefix(open.as_str())?
            .strip_suffix(close.as_str())?;

        let (source, rest) = body.rsplit_once(":Build ")?;
        let (count, timestamp) = rest.split_once(" at ")?;
        Some(Self::new(tag, source, count.parse().ok()?, timestamp.parse().ok()?))
    }

    /// Find every well-formed version string for `tag` inside arbitrary
    /// bytes, such as a compiled binary.
    pub fn scan(haystack: &[u8], tag: &str) -> Vec<Self> {
        let open = format!("<{tag}>");
        let close = format!("</{tag}>");
        let mut found = Vec::new();
        let mut rest = haystack;

        while let Some(start) = find_bytes(rest, open.as_bytes()) {
            let body = &rest[start + open.len()..];
            let Some(end) = find_bytes(body, close.as_bytes()) else {
                break;
            };
            // Pair the close tag with the nearest opener before it so each
            // byte is searched a bounded number of times.
            let region = &rest[start..start + open.len() + end];
            let inner = rfind_bytes(region, open.as_bytes()).unwrap_or(0);
            let span = &rest[start + inner..start + open.len() + end + close.len()];
            if let Some(parsed) = std::str::from_utf8(span)
                .ok()
                .and_then(|text| Self::parse(text, tag))
            {
                found.push(parsed);
            }
            rest = &rest[start + open.len() + end + close.len()..];
        }
        found
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "<{tag}>{}:Build {} at {}</{tag}>",
            self.source,
            self.count,
            self.timestamp,
            tag = self.tag
        )
    }
}

/// Render `<tag>source:Build count at timestamp</tag>\n`.
pub fn compose_version_string(tag: &str, source_display_name: &str, count: u64, timestamp: u64) -> String {
    VersionString::new(tag, source_display_name, count, timestamp).to_string()
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn rfind_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .rposition(|window| window == needle)
}
