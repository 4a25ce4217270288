//! Path matching logic.
//!
//! # Responsibilities
//! - Normalize request paths before matching: percent-decode, resolve dot
//!   segments
//! - Match exact paths and segment-aware prefixes
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefixes respect segment boundaries: `/auth` matches `/auth/reset`
//!   but never `/authority`
//! - The root pattern `/` is exact; a root prefix would match everything
//! - No regex to guarantee O(n) matching
//! - Matching sees the path the downstream router resolves: `%61dmin` is
//!   `admin`, `/a/../admin` is `/admin`, and `\` separates segments
//! - Normalize a raw path exactly once; decoding is not idempotent

/// Normalize a raw path for matching.
///
/// Strips query and fragment, percent-decodes (invalid UTF-8 is replaced),
/// resolves `.` and `..` (never above the root), collapses repeated
/// slashes and drops the trailing `/` (except for the root).
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let bytes = urlencoding::decode_binary(path[..end].as_bytes());
    let decoded = String::from_utf8_lossy(&bytes);

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", segments.join("/"))
}

/// A compiled path condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Matches one path only.
    Exact(String),
    /// Matches a path and everything below it.
    Prefix(String),
}

impl PathPattern {
    /// Compile a configured route path.
    pub fn parse(raw: &str) -> Self {
        let path = normalize_path(raw);
        if path == "/" {
            PathPattern::Exact(path)
        } else {
            PathPattern::Prefix(path)
        }
    }

    /// Returns true if the normalized `path` matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(expected) => path == expected,
            PathPattern::Prefix(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }

    /// Number of bytes pinned by the pattern; longer patterns win ties.
    pub fn specificity(&self) -> usize {
        match self {
            PathPattern::Exact(p) => p.len() + 1,
            PathPattern::Prefix(p) => p.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PathPattern::Exact(p) | PathPattern::Prefix(p) => p,
        }
    }
}
