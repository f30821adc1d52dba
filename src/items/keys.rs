//! Composite key formats and attribute names.

use crate::keywords::tokenizer::normalize_term;

// --- Attribute names ---

pub const ATTR_PK: &str = "PK";
pub const ATTR_SK: &str = "SK";
pub const ATTR_GSI1PK: &str = "GSI1PK";
pub const ATTR_GSI1SK: &str = "GSI1SK";
pub const ATTR_GSI2PK: &str = "GSI2PK";
pub const ATTR_GSI2SK: &str = "GSI2SK";
pub const ATTR_GSI3PK: &str = "GSI3PK";
pub const ATTR_GSI3SK: &str = "GSI3SK";

// --- Index names ---

pub const AUTHOR_INDEX: &str = "AuthorIndex";
pub const PAPER_ID_INDEX: &str = "PaperIdIndex";
pub const KEYWORD_INDEX: &str = "KeywordIndex";

// --- Key prefixes ---

pub const PAPER_PREFIX: &str = "PAPER#";
pub const CATEGORY_PREFIX: &str = "CATEGORY#";
pub const AUTHOR_PREFIX: &str = "AUTHOR#";
pub const KEYWORD_PREFIX: &str = "KEYWORD#";

/// Sort key of the primary paper item.
pub const PAPER_SORT_KEY: &str = "PAPER";

/// Separator closing a date-range scan. It is the byte right after `#`, so the exclusive bound
/// `<end>$` sits above every `<end>#<id>` key whatever the id's characters.
pub const RANGE_END_SEPARATOR: &str = "$";

pub fn paper_key(arxiv_id: &str) -> String {
    format!("{}{}", PAPER_PREFIX, arxiv_id)
}

pub fn category_key(category: &str) -> String {
    format!("{}{}", CATEGORY_PREFIX, category)
}

pub fn author_key(name: &str) -> String {
    format!("{}{}", AUTHOR_PREFIX, normalize_term(name))
}

pub fn keyword_key(keyword: &str) -> String {
    format!("{}{}", KEYWORD_PREFIX, normalize_term(keyword))
}

/// `<date>#<id>`: orders a partition by publication date, then id.
pub fn date_sort_key(published: &str, arxiv_id: &str) -> String {
    format!("{}#{}", published, arxiv_id)
}

/// Sort-key bounds `[low, high)` covering every item dated `start..=end`.
pub fn date_range_bounds(start: &str, end: &str) -> (String, String) {
    (format!("{}#", start), format!("{}{}", end, RANGE_END_SEPARATOR))
}
