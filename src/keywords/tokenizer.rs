use regex::Regex;
use std::sync::LazyLock;

/// A token starts with an ASCII letter and continues with letters, digits, hyphens or
/// apostrophes. Single letters never match.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z][A-Za-z0-9'\-]+").expect("valid word pattern"));

/// Splits text into lowercase tokens, preserving order and duplicates.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Normalizes a lookup term the way keys are normalized at write time:
/// lowercase with runs of whitespace collapsed to a single space.
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
