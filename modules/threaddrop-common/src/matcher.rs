use std::sync::LazyLock;

use regex::Regex;

use crate::types::RawCandidate;

/// Width of a `0x`-prefixed 20-byte hex address.
pub const ADDRESS_LEN: usize = 42;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"0x[0-9A-Za-z]+").unwrap());
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\S+\.eth").unwrap());

/// Remove CR, LF and CRLF so a token wrapped across lines is matched whole.
pub fn strip_line_breaks(text: &str) -> String {
    text.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

/// First `0x` token in `text`, truncated to [`ADDRESS_LEN`] characters.
///
/// Characters after the prefix are not checked for hex here.
pub fn first_address(text: &str) -> Option<String> {
    ADDRESS_RE
        .find(text)
        .map(|m| m.as_str().chars().take(ADDRESS_LEN).collect())
}

/// First run of non-whitespace ending in `.eth`, any case, case preserved.
pub fn first_name(text: &str) -> Option<String> {
    NAME_RE.find(text).map(|m| m.as_str().to_string())
}

/// Extract at most one address-shaped and one name-shaped candidate from `text`.
///
/// Only the first occurrence of each kind is taken; a reply listing two
/// addresses yields the first one. The address candidate, when present, comes
/// before the name candidate.
pub fn extract_candidates(text: &str) -> Vec<RawCandidate> {
    let text = strip_line_breaks(text);
    let mut out = Vec::with_capacity(2);
    if let Some(token) = first_address(&text) {
        out.push(RawCandidate::address(token));
    }
    if let Some(token) = first_name(&text) {
        out.push(RawCandidate::name(token));
    }
    out
}
