//! Fallback encyclopedia links for arrows and events without a source URL.

use regex::Regex;
use std::sync::LazyLock;

/// Base URL that slugs are appended to.
pub const ENCYCLOPEDIA_BASE_URL: &str = "https://en.wikipedia.org/wiki/";

/// Parenthetical asides such as `"(1492)"`.
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

/// Runs of whitespace.
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Builds an encyclopedia URL from an English title.
///
/// Parenthetical content is removed, whitespace collapsed, spaces become
/// underscores and the result is percent-encoded. The link is not checked
/// for reachability. Returns `None` for titles that are empty after
/// cleaning.
#[must_use]
pub fn encyclopedia_url(title: &str) -> Option<String> {
    let without_asides = PARENTHETICAL_RE.replace_all(title, " ");
    let collapsed = WHITESPACE_RE.replace_all(without_asides.trim(), " ");
    if collapsed.is_empty() {
        return None;
    }

    let slug = collapsed.replace(' ', "_");
    Some(format!("{ENCYCLOPEDIA_BASE_URL}{}", urlencoding::encode(&slug)))
}

/// Returns the explicit source when it is already a URL, otherwise derives
/// one from `title`.
#[must_use]
pub fn reference_url(source: &str, title: &str) -> Option<String> {
    let source = source.trim();
    if source.starts_with("http://") || source.starts_with("https://") {
        return Some(source.to_string());
    }
    encyclopedia_url(title)
}
