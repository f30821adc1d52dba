//! Query Data Types
//!
//! The closed set of supported lookups, the projections they return and the query error.

use crate::storage::types::{Item, StoreError, string_attr};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Result size of `recent` and `keyword` lookups when the caller gives none.
pub const DEFAULT_LIMIT: usize = 20;

/// One supported access pattern. Each variant resolves to exactly one index lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaperQuery {
    Recent { category: String, limit: usize },
    ByAuthor { name: String },
    ById { id: String },
    DateRange {
        category: String,
        start: String,
        end: String,
    },
    ByKeyword { keyword: String, limit: usize },
}

impl PaperQuery {
    pub fn query_type(&self) -> &'static str {
        match self {
            PaperQuery::Recent { .. } => "recent_in_category",
            PaperQuery::ByAuthor { .. } => "papers_by_author",
            PaperQuery::ById { .. } => "get_paper_by_id",
            PaperQuery::DateRange { .. } => "papers_in_date_range",
            PaperQuery::ByKeyword { .. } => "papers_by_keyword",
        }
    }

    /// The lookup arguments, keyed by name.
    pub fn parameters(&self) -> BTreeMap<String, Value> {
        let pairs: Vec<(&str, Value)> = match self {
            PaperQuery::Recent { category, limit } => {
                vec![("category", category.as_str().into()), ("limit", (*limit).into())]
            }
            PaperQuery::ByAuthor { name } => vec![("author", name.as_str().into())],
            PaperQuery::ById { id } => vec![("arxiv_id", id.as_str().into())],
            PaperQuery::DateRange {
                category,
                start,
                end,
            } => vec![
                ("category", category.as_str().into()),
                ("start_date", start.as_str().into()),
                ("end_date", end.as_str().into()),
            ],
            PaperQuery::ByKeyword { keyword, limit } => {
                vec![("keyword", keyword.as_str().into()), ("limit", (*limit).into())]
            }
        };
        pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

/// The common public view carried by every index item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub arxiv_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub published: String,
    pub categories: Vec<String>,
}

impl PaperSummary {
    pub fn from_item(item: &Item) -> Self {
        Self {
            arxiv_id: string_attr(item, "arxiv_id").unwrap_or_default().to_string(),
            title: string_attr(item, "title").unwrap_or_default().to_string(),
            authors: string_list(item, "authors"),
            published: string_attr(item, "published").unwrap_or_default().to_string(),
            categories: string_list(item, "categories"),
        }
    }
}

/// The by-id view: the summary plus the abstract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperDetail {
    #[serde(flatten)]
    pub summary: PaperSummary,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

impl PaperDetail {
    pub fn from_item(item: &Item) -> Self {
        Self {
            summary: PaperSummary::from_item(item),
            abstract_text: string_attr(item, "abstract").unwrap_or_default().to_string(),
        }
    }
}

fn string_list(item: &Item, name: &str) -> Vec<String> {
    match item.get(name) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResults {
    Papers(Vec<PaperSummary>),
    Details(Vec<PaperDetail>),
}

impl QueryResults {
    pub fn len(&self) -> usize {
        match self {
            QueryResults::Papers(papers) => papers.len(),
            QueryResults::Details(details) => details.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finished query with its arguments and timing.
#[derive(Debug, Clone, Serialize)]
pub struct QueryOutcome {
    pub query_type: &'static str,
    pub parameters: BTreeMap<String, Value>,
    pub results: QueryResults,
    pub count: usize,
    pub execution_time_ms: u64,
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("lookup on table '{table}' failed: {source}")]
    Store {
        table: String,
        #[source]
        source: StoreError,
    },
}
