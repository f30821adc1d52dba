//! Store node HTTP handlers.

use super::protocol::*;
use super::store::TableStore;
use super::types::{QueryRequest, StoreError, TableDescription, TableSchema};
use crate::telemetry::log_requests;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode},
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

/// A table store served over HTTP, optionally pinned to a region.
pub struct StoreNode {
    store: Arc<dyn TableStore>,
    region: Option<String>,
}

impl StoreNode {
    pub fn new(store: Arc<dyn TableStore>, region: Option<String>) -> Arc<Self> {
        Arc::new(Self { store, region })
    }

    /// Requests addressed to a different region are refused; unlabelled requests pass.
    fn check_region(&self, headers: &HeaderMap) -> Result<(), StoreError> {
        let requested = headers
            .get(REGION_HEADER)
            .and_then(|value| value.to_str().ok());
        match (&self.region, requested) {
            (Some(own), Some(requested)) if own != requested => Err(StoreError::Rejected(
                format!("node serves region '{}', not '{}'", own, requested),
            )),
            _ => Ok(()),
        }
    }
}

type HandlerResult<T> = Result<(StatusCode, Json<T>), (StatusCode, Json<ErrorResponse>)>;

fn failure(err: StoreError) -> (StatusCode, Json<ErrorResponse>) {
    let body = ErrorResponse::from(&err);
    match &err {
        StoreError::TableNotFound(_) | StoreError::TableAlreadyExists(_) => {
            tracing::debug!("Store request failed: {}", err)
        }
        _ => tracing::warn!("Store request failed: {}", err),
    }
    (body.status(), Json(body))
}

pub fn router(node: Arc<StoreNode>) -> Router {
    Router::new()
        .route(
            &format!("{}/:name", ENDPOINT_TABLES),
            get(handle_describe_table).put(handle_create_table),
        )
        .route(
            &format!("{}/:name{}", ENDPOINT_TABLES, ENDPOINT_BATCH_SUFFIX),
            post(handle_batch_write),
        )
        .route(
            &format!("{}/:name{}", ENDPOINT_TABLES, ENDPOINT_QUERY_SUFFIX),
            post(handle_query),
        )
        .layer(middleware::from_fn(log_requests))
        .layer(Extension(node))
}

pub async fn handle_describe_table(
    Extension(node): Extension<Arc<StoreNode>>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> HandlerResult<TableDescription> {
    node.check_region(&headers).map_err(failure)?;

    match node.store.describe_table(&name).await {
        Ok(description) => Ok((StatusCode::OK, Json(description))),
        Err(e) => Err(failure(e)),
    }
}

pub async fn handle_create_table(
    Extension(node): Extension<Arc<StoreNode>>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Json(schema): Json<TableSchema>,
) -> HandlerResult<TableDescription> {
    node.check_region(&headers).map_err(failure)?;

    if schema.name != name {
        return Err(failure(StoreError::Rejected(format!(
            "schema names table '{}' but path names '{}'",
            schema.name, name
        ))));
    }

    match node.store.create_table(schema).await {
        Ok(description) => Ok((StatusCode::CREATED, Json(description))),
        Err(e) => Err(failure(e)),
    }
}

pub async fn handle_batch_write(
    Extension(node): Extension<Arc<StoreNode>>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Json(req): Json<BatchWriteRequest>,
) -> HandlerResult<BatchWriteResponse> {
    node.check_region(&headers).map_err(failure)?;

    match node.store.batch_write(&name, &req.items).await {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(BatchWriteResponse {
                written: req.items.len(),
            }),
        )),
        Err(e) => Err(failure(e)),
    }
}

pub async fn handle_query(
    Extension(node): Extension<Arc<StoreNode>>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Json(mut req): Json<QueryRequest>,
) -> HandlerResult<QueryResponse> {
    node.check_region(&headers).map_err(failure)?;

    // The path is authoritative for the table name.
    req.table = name;

    match node.store.query(&req).await {
        Ok(items) => Ok((
            StatusCode::OK,
            Json(QueryResponse {
                count: items.len(),
                items,
            }),
        )),
        Err(e) => Err(failure(e)),
    }
}
