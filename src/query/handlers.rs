//! HTTP front end for the query layer.

use super::query::QueryLayer;
use super::types::{DEFAULT_LIMIT, PaperDetail, PaperSummary, QueryError};
use crate::telemetry::log_requests;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    middleware,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub category: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub category: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub category: String,
    pub papers: Vec<PaperSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub author: String,
    pub papers: Vec<PaperSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KeywordResponse {
    pub keyword: String,
    pub papers: Vec<PaperSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DateRangeResponse {
    pub category: String,
    pub start: String,
    pub end: String,
    pub papers: Vec<PaperSummary>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

type HandlerResult<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

fn error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

fn backend_failure(err: QueryError) -> (StatusCode, Json<ErrorBody>) {
    tracing::error!("Query failed: {}", err);
    error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn required(value: Option<String>, name: &str) -> Result<String, (StatusCode, Json<ErrorBody>)> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(error(
            StatusCode::BAD_REQUEST,
            format!("{} parameter is required", name),
        )),
    }
}

fn parse_limit(limit: Option<String>) -> Result<usize, (StatusCode, Json<ErrorBody>)> {
    match limit {
        None => Ok(DEFAULT_LIMIT),
        Some(raw) => raw.trim().parse().map_err(|_| {
            error(
                StatusCode::BAD_REQUEST,
                format!("limit must be a non-negative integer, got '{}'", raw),
            )
        }),
    }
}

pub fn router(layer: Arc<QueryLayer>) -> Router {
    Router::new()
        .route("/papers/recent", get(handle_recent))
        .route("/papers/search", get(handle_date_range))
        .route("/papers/author/:name", get(handle_by_author))
        .route("/papers/keyword/:keyword", get(handle_by_keyword))
        .route("/papers/:id", get(handle_by_id))
        .layer(middleware::from_fn(log_requests))
        .layer(Extension(layer))
}

pub async fn handle_recent(
    Extension(layer): Extension<Arc<QueryLayer>>,
    Query(params): Query<RecentParams>,
) -> HandlerResult<CategoryResponse> {
    let category = required(params.category, "category")?;
    let limit = parse_limit(params.limit)?;

    let papers = layer
        .recent_in_category(&category, limit)
        .await
        .map_err(backend_failure)?;

    Ok(Json(CategoryResponse {
        category,
        count: papers.len(),
        papers,
    }))
}

pub async fn handle_by_author(
    Extension(layer): Extension<Arc<QueryLayer>>,
    Path(name): Path<String>,
) -> HandlerResult<AuthorResponse> {
    let papers = layer.by_author(&name).await.map_err(backend_failure)?;

    Ok(Json(AuthorResponse {
        author: name,
        count: papers.len(),
        papers,
    }))
}

pub async fn handle_by_id(
    Extension(layer): Extension<Arc<QueryLayer>>,
    Path(id): Path<String>,
) -> HandlerResult<PaperDetail> {
    match layer.by_id(&id).await.map_err(backend_failure)? {
        Some(detail) => Ok(Json(detail)),
        None => Err(error(StatusCode::NOT_FOUND, "Paper not found")),
    }
}

pub async fn handle_date_range(
    Extension(layer): Extension<Arc<QueryLayer>>,
    Query(params): Query<SearchParams>,
) -> HandlerResult<DateRangeResponse> {
    let category = required(params.category, "category")?;
    let start = required(params.start, "start")?;
    let end = required(params.end, "end")?;

    let papers = layer
        .date_range(&category, &start, &end)
        .await
        .map_err(backend_failure)?;

    Ok(Json(DateRangeResponse {
        category,
        start,
        end,
        count: papers.len(),
        papers,
    }))
}

pub async fn handle_by_keyword(
    Extension(layer): Extension<Arc<QueryLayer>>,
    Path(keyword): Path<String>,
    Query(params): Query<LimitParams>,
) -> HandlerResult<KeywordResponse> {
    let limit = parse_limit(params.limit)?;

    let papers = layer
        .by_keyword(&keyword, limit)
        .await
        .map_err(backend_failure)?;

    Ok(Json(KeywordResponse {
        keyword,
        count: papers.len(),
        papers,
    }))
}
