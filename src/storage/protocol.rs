//! Store Node Protocol
//!
//! HTTP endpoints and JSON bodies spoken between `RemoteStore` and a store node.

use super::types::{Item, StoreError};

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

// --- API Endpoints ---

/// Table root; `GET /tables/{name}` describes, `PUT /tables/{name}` creates.
pub const ENDPOINT_TABLES: &str = "/tables";
/// Suffix of the batch upsert endpoint, `POST /tables/{name}/batch`.
pub const ENDPOINT_BATCH_SUFFIX: &str = "/batch";
/// Suffix of the query endpoint, `POST /tables/{name}/query`.
pub const ENDPOINT_QUERY_SUFFIX: &str = "/query";

/// Header naming the region the client believes it is talking to.
pub const REGION_HEADER: &str = "x-store-region";

// --- Data Transfer Objects ---

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchWriteRequest {
    pub items: Vec<Item>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchWriteResponse {
    pub written: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueryResponse {
    pub items: Vec<Item>,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    TableNotFound,
    TableAlreadyExists,
    TableNotActive,
    IndexNotFound,
    Rejected,
    Serialization,
    Internal,
}

/// Error body returned by a store node.
///
/// `code` lets the client rebuild the exact `StoreError` variant instead of guessing from
/// the HTTP status.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
}

impl ErrorResponse {
    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::TableNotFound | ErrorCode::IndexNotFound => StatusCode::NOT_FOUND,
            ErrorCode::TableAlreadyExists => StatusCode::CONFLICT,
            ErrorCode::TableNotActive => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::Rejected | ErrorCode::Serialization => StatusCode::BAD_REQUEST,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_store_error(self) -> StoreError {
        let table = self.table.unwrap_or_default();
        match self.code {
            ErrorCode::TableNotFound => StoreError::TableNotFound(table),
            ErrorCode::TableAlreadyExists => StoreError::TableAlreadyExists(table),
            ErrorCode::TableNotActive => StoreError::TableNotActive(table),
            ErrorCode::IndexNotFound => StoreError::IndexNotFound {
                table,
                index: self.index.unwrap_or_default(),
            },
            ErrorCode::Rejected => StoreError::Rejected(self.error),
            ErrorCode::Serialization => StoreError::Serialization(self.error),
            ErrorCode::Internal => StoreError::Transport(self.error),
        }
    }
}

impl From<&StoreError> for ErrorResponse {
    fn from(err: &StoreError) -> Self {
        let (code, table, index) = match err {
            StoreError::TableNotFound(t) => (ErrorCode::TableNotFound, Some(t.clone()), None),
            StoreError::TableAlreadyExists(t) => {
                (ErrorCode::TableAlreadyExists, Some(t.clone()), None)
            }
            StoreError::TableNotActive(t) => (ErrorCode::TableNotActive, Some(t.clone()), None),
            StoreError::IndexNotFound { table, index } => (
                ErrorCode::IndexNotFound,
                Some(table.clone()),
                Some(index.clone()),
            ),
            StoreError::Rejected(_) => (ErrorCode::Rejected, None, None),
            StoreError::Serialization(_) => (ErrorCode::Serialization, None, None),
            StoreError::Transport(_) => (ErrorCode::Internal, None, None),
        };
        // Free-text variants travel without their display prefix so the client can rebuild
        // them verbatim.
        let error = match err {
            StoreError::Rejected(message)
            | StoreError::Serialization(message)
            | StoreError::Transport(message) => message.clone(),
            other => other.to_string(),
        };

        Self {
            error,
            code,
            table,
            index,
        }
    }
}
