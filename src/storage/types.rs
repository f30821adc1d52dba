//! Storage Data Types
//!
//! Schemas, query requests and the store error taxonomy shared by every backend and by the
//! store-node wire protocol.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored row: attribute name to JSON value.
pub type Item = serde_json::Map<String, serde_json::Value>;

/// Partition/sort attribute pair of the table or of one secondary index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySchema {
    pub partition_attr: String,
    pub sort_attr: String,
}

impl KeySchema {
    pub fn new(partition_attr: &str, sort_attr: &str) -> Self {
        Self {
            partition_attr: partition_attr.to_string(),
            sort_attr: sort_attr.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Projection {
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryIndex {
    pub name: String,
    pub key: KeySchema,
    pub projection: Projection,
}

/// Capacity model. Only pay-per-request tables are provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillingMode {
    PayPerRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub key: KeySchema,
    pub indexes: Vec<SecondaryIndex>,
    pub billing_mode: BillingMode,
}

impl TableSchema {
    pub fn index(&self, name: &str) -> Option<&SecondaryIndex> {
        self.indexes.iter().find(|index| index.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Creating,
    Active,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescription {
    pub schema: TableSchema,
    pub status: TableStatus,
    pub item_count: usize,
}

/// Condition on the sort key of the queried index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SortCondition {
    /// Inclusive on both ends, compared lexicographically.
    Between { low: String, high: String },
    /// Inclusive `low`, exclusive `high`.
    Range { low: String, high: String },
}

impl SortCondition {
    pub fn matches(&self, sort_key: &str) -> bool {
        match self {
            SortCondition::Between { low, high } => {
                low.as_str() <= sort_key && sort_key <= high.as_str()
            }
            SortCondition::Range { low, high } => {
                low.as_str() <= sort_key && sort_key < high.as_str()
            }
        }
    }
}

/// A single-partition lookup on the table or one of its secondary indexes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub partition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortCondition>,
    /// Ascending sort-key order when true.
    pub forward: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl QueryRequest {
    pub fn new(table: &str, partition: String) -> Self {
        Self {
            table: table.to_string(),
            index: None,
            partition,
            sort: None,
            forward: true,
            limit: None,
        }
    }

    pub fn on_index(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn between(mut self, low: String, high: String) -> Self {
        self.sort = Some(SortCondition::Between { low, high });
        self
    }

    pub fn range(mut self, low: String, high: String) -> Self {
        self.sort = Some(SortCondition::Range { low, high });
        self
    }

    pub fn descending(mut self) -> Self {
        self.forward = false;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table '{0}' not found")]
    TableNotFound(String),
    #[error("table '{0}' already exists")]
    TableAlreadyExists(String),
    #[error("table '{0}' is not active yet")]
    TableNotActive(String),
    #[error("index '{index}' not found on table '{table}'")]
    IndexNotFound { table: String, index: String },
    #[error("store transport failure: {0}")]
    Transport(String),
    #[error("store rejected the request: {0}")]
    Rejected(String),
    #[error("store payload could not be (de)serialized: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Failures worth retrying with backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transport(_) | StoreError::TableNotActive(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::TableNotFound(_))
    }
}

/// Reads a string attribute.
pub fn string_attr<'a>(item: &'a Item, name: &str) -> Option<&'a str> {
    item.get(name).and_then(|value| value.as_str())
}
