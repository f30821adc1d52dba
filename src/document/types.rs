//! Document Data Types

use serde::{Deserialize, Serialize};

/// A raw input record as decoded from JSON. Field names and shapes vary between sources.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Field names accepted as the document id, in lookup order.
pub const ID_FIELDS: [&str; 3] = ["arxiv_id", "id", "arxivId"];

/// Field names accepted as the publication timestamp, in lookup order.
pub const PUBLISHED_FIELDS: [&str; 3] = ["published", "published_at", "date"];

/// A normalized bibliographic record.
///
/// Every field is present once normalization succeeds; lists and text may be empty.
/// `published` always holds the date-only form (`YYYY-MM-DD` when the raw value parsed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub arxiv_id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub categories: Vec<String>,
    pub published: String,
}
