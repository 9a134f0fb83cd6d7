//! Textual classification of IP addresses.
//!
//! Matching is purely textual on purpose: IPv6 loopback and link-local
//! addresses count as local, but only IPv4 literals are "quad-shaped" and
//! may be sent to the geo lookup without DNS resolution.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

static LOCAL_PATTERNS: Lazy<Option<RegexSet>> = Lazy::new(|| {
    RegexSet::new([
        r"^127\.",
        r"^10\.",
        r"^192\.168\.",
        r"^172\.(1[6-9]|2\d|3[0-1])\.",
        r"^::1$",
        r"^fe80:",
    ])
    .ok()
});

static QUAD_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+$").ok());

/// Whether `address` is loopback, RFC 1918 private or IPv6 link-local
pub fn is_local(address: &str) -> bool {
    if address.is_empty() {
        return false;
    }

    LOCAL_PATTERNS
        .as_ref()
        .is_some_and(|patterns| patterns.is_match(address))
}

/// Whether `value` looks like a dotted-quad IPv4 literal
pub fn is_quad_shaped(value: &str) -> bool {
    QUAD_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}
