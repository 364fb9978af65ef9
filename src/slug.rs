//! Slugs and normalized identifiers
//!
//! Two derivations are used across the catalog:
//! - `slugify`: URL-safe slug for tests, glossary terms and providers
//! - `normalize_vendor_id`: join key for vendor consolidation, tolerant of
//!   punctuation and spacing differences between sources

use regex::Regex;
use std::sync::OnceLock;

fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").expect("static regex"))
}

fn separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\s_-]+").expect("static regex"))
}

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"))
}

/// Generate a URL slug from a display name.
///
/// Lowercase, drop characters outside word/space/hyphen, collapse runs of
/// whitespace, underscores and hyphens into one hyphen, trim hyphens.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let stripped = non_word().replace_all(&lower, "");
    let collapsed = separators().replace_all(&stripped, "-");
    collapsed.trim_matches('-').to_string()
}

/// Normalize a vendor display string into a join key.
///
/// `"Guardant Health"`, `"guardant health "` and `"Guardant-Health"` all map
/// to `guardant-health`.
pub fn normalize_vendor_id(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let hyphenated = non_alphanumeric().replace_all(&lower, "-");
    hyphenated.trim_matches('-').to_string()
}
