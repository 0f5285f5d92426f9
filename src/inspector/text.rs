//! Text normalization and truncation for report lines.

use regex::Regex;
use std::sync::OnceLock;

const ELLIPSIS: &str = "...";

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\r\n|[\r\n\x0B]").expect("line break pattern is valid"))
}

/// Trims surrounding whitespace and turns each line break into one space.
pub fn normalize(text: &str) -> String {
    line_break_re().replace_all(text.trim(), " ").into_owned()
}

/// First `limit` characters of `text`, without regard for word boundaries.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Like [`truncate`], but marks a cut with a trailing ellipsis.
pub fn snippet(text: &str, limit: usize) -> String {
    let cut = truncate(text, limit);
    if cut.len() < text.len() {
        format!("{}{}", cut, ELLIPSIS)
    } else {
        cut
    }
}
