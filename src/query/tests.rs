//! Query Layer Tests
//!
//! ## Test Scopes
//! - **Access patterns**: ordering, limits and bounds of each of the five lookups.
//! - **Normalization**: author and keyword lookups ignore case and spacing.
//! - **Failure mapping**: a missing table reads as empty, other store failures surface.
//! - **Front end**: status codes and response bodies of the HTTP handlers.

#[cfg(test)]
mod tests {
    use crate::document::types::RawRecord;
    use crate::keywords::extractor::KeywordConfig;
    use crate::loader::loader::BulkLoader;
    use crate::loader::types::LoaderConfig;
    use crate::provisioner::provisioner::TableProvisioner;
    use crate::query::handlers::*;
    use crate::query::query::QueryLayer;
    use crate::query::types::*;
    use crate::storage::memory::MemoryStore;
    use crate::storage::store::{TableHandle, TableStore};
    use crate::storage::types::*;
    use async_trait::async_trait;
    use axum::Json;
    use axum::extract::{Extension, Path, Query};
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn fixtures() -> Vec<RawRecord> {
        vec![
            record(json!({
                "id": "P1",
                "title": "Graph Learning",
                "categories": ["cs.AI", "cs.LG"],
                "authors": ["Ada Lovelace"],
                "abstract": "graph neural networks for graph learning",
                "published": "2024-03-01T00:00:00Z"
            })),
            record(json!({
                "id": "J0",
                "title": "Before January",
                "categories": ["cs.AI"],
                "authors": ["Jane Doe"],
                "abstract": "transformers everywhere",
                "published": "2023-12-31T23:59:59Z"
            })),
            record(json!({
                "id": "J1",
                "title": "New Year",
                "categories": ["cs.AI"],
                "authors": ["Jane Doe", "Ada Lovelace"],
                "abstract": "graph transformers",
                "published": "2024-01-01T00:00:00Z"
            })),
            record(json!({
                "id": "J2",
                "title": "Mid January",
                "categories": ["cs.AI"],
                "authors": ["JANE   doe"],
                "abstract": "sparse attention",
                "published": "2024-01-15"
            })),
            record(json!({
                "id": "J3",
                "title": "End of January",
                "categories": ["cs.AI"],
                "authors": ["Grace Hopper"],
                "abstract": "compilers for graph workloads",
                "published": "2024-01-31T18:30:00Z"
            })),
            record(json!({
                "id": "F1",
                "title": "February",
                "categories": ["cs.AI"],
                "authors": ["Grace Hopper"],
                "abstract": "graph compilers",
                "published": "2024-02-01"
            })),
        ]
    }

    async fn loaded_layer() -> QueryLayer {
        let table = TableProvisioner::new(Arc::new(MemoryStore::new()))
            .ensure_table("papers")
            .await
            .unwrap();
        let config = LoaderConfig {
            keywords: KeywordConfig::default().with_max_keywords(3),
            ..LoaderConfig::default()
        };
        BulkLoader::new(table.clone(), config)
            .load(fixtures())
            .await
            .unwrap();
        QueryLayer::new(table)
    }

    fn ids(papers: &[PaperSummary]) -> Vec<&str> {
        papers.iter().map(|p| p.arxiv_id.as_str()).collect()
    }

    /// Fails every query with a transport error.
    struct UnreachableStore;

    #[async_trait]
    impl TableStore for UnreachableStore {
        async fn describe_table(&self, name: &str) -> Result<TableDescription, StoreError> {
            Err(StoreError::TableNotFound(name.to_string()))
        }

        async fn create_table(&self, schema: TableSchema) -> Result<TableDescription, StoreError> {
            Err(StoreError::TableAlreadyExists(schema.name))
        }

        async fn batch_write(&self, _table: &str, _items: &[Item]) -> Result<(), StoreError> {
            Ok(())
        }

        async fn query(&self, _request: &QueryRequest) -> Result<Vec<Item>, StoreError> {
            Err(StoreError::Transport("connection refused".into()))
        }
    }

    // ============================================================
    // ACCESS PATTERNS
    // ============================================================

    #[tokio::test]
    async fn test_reference_paper_by_id_and_recent() {
        let layer = loaded_layer().await;

        let detail = layer.by_id("P1").await.unwrap().unwrap();
        assert_eq!(detail.summary.title, "Graph Learning");
        assert_eq!(detail.summary.authors, vec!["Ada Lovelace"]);
        assert_eq!(detail.summary.categories, vec!["cs.AI", "cs.LG"]);
        assert_eq!(detail.summary.published, "2024-03-01");
        assert_eq!(detail.abstract_text, "graph neural networks for graph learning");

        let recent = layer.recent_in_category("cs.AI", 10).await.unwrap();
        assert!(ids(&recent).contains(&"P1"));
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let layer = loaded_layer().await;

        let top = layer.recent_in_category("cs.AI", 2).await.unwrap();
        assert_eq!(ids(&top), vec!["P1", "F1"]);

        let all = layer.recent_in_category("cs.AI", 100).await.unwrap();
        assert_eq!(ids(&all), vec!["P1", "F1", "J3", "J2", "J1", "J0"]);
        assert!(all.windows(2).all(|w| w[0].published >= w[1].published));

        assert!(layer.recent_in_category("cs.AI", 0).await.unwrap().is_empty());
        assert!(layer.recent_in_category("q-bio", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_date_range_is_inclusive() {
        let layer = loaded_layer().await;

        let january = layer
            .date_range("cs.AI", "2024-01-01", "2024-01-31")
            .await
            .unwrap();
        assert_eq!(ids(&january), vec!["J1", "J2", "J3"]);

        let single_day = layer
            .date_range("cs.AI", "2024-01-15", "2024-01-15")
            .await
            .unwrap();
        assert_eq!(ids(&single_day), vec!["J2"]);

        let inverted = layer
            .date_range("cs.AI", "2024-02-01", "2024-01-01")
            .await
            .unwrap();
        assert!(inverted.is_empty());
    }

    #[tokio::test]
    async fn test_date_range_end_date_includes_any_id() {
        let table = TableProvisioner::new(Arc::new(MemoryStore::new()))
            .ensure_table("papers")
            .await
            .unwrap();
        let records = ["A1", "~1", "é1", "\u{10FFFF}"]
            .iter()
            .map(|id| record(json!({"id": id, "categories": ["cs.AI"], "published": "2024-01-31"})))
            .collect::<Vec<_>>();
        BulkLoader::new(table.clone(), LoaderConfig::default())
            .load(records)
            .await
            .unwrap();
        let layer = QueryLayer::new(table);

        let found = layer
            .date_range("cs.AI", "2024-01-01", "2024-01-31")
            .await
            .unwrap();
        assert_eq!(ids(&found), vec!["A1", "~1", "é1", "\u{10FFFF}"]);

        let before = layer
            .date_range("cs.AI", "2024-01-01", "2024-01-30")
            .await
            .unwrap();
        assert!(before.is_empty());
    }

    #[tokio::test]
    async fn test_summaries_omit_abstract() {
        let layer = loaded_layer().await;
        let papers = layer.by_author("Grace Hopper").await.unwrap();

        let json = serde_json::to_value(&papers[0]).unwrap();
        assert!(json.get("abstract").is_none());
        assert_eq!(json["arxiv_id"], json!("J3"));
    }

    #[tokio::test]
    async fn test_by_id_unknown_is_none() {
        let layer = loaded_layer().await;
        assert!(layer.by_id("missing").await.unwrap().is_none());
    }

    // ============================================================
    // NORMALIZATION
    // ============================================================

    #[tokio::test]
    async fn test_author_lookup_ignores_case_and_spacing() {
        let layer = loaded_layer().await;

        let spaced = layer.by_author("Jane   Doe").await.unwrap();
        let plain = layer.by_author("jane doe").await.unwrap();

        assert_eq!(spaced, plain);
        assert_eq!(ids(&plain), vec!["J0", "J1", "J2"]);
    }

    #[tokio::test]
    async fn test_keyword_lookup() {
        let layer = loaded_layer().await;

        let graph = layer.by_keyword("GRAPH", DEFAULT_LIMIT).await.unwrap();
        assert_eq!(ids(&graph), vec!["P1", "F1", "J3", "J1"]);

        let limited = layer.by_keyword(" graph ", 1).await.unwrap();
        assert_eq!(ids(&limited), vec!["P1"]);

        assert!(layer.by_keyword("the", 5).await.unwrap().is_empty());
    }

    // ============================================================
    // FAILURE MAPPING
    // ============================================================

    #[tokio::test]
    async fn test_missing_table_reads_empty() {
        let layer = QueryLayer::new(TableHandle::new(Arc::new(MemoryStore::new()), "absent"));

        assert!(layer.recent_in_category("cs.AI", 5).await.unwrap().is_empty());
        assert!(layer.by_author("anyone").await.unwrap().is_empty());
        assert!(layer.by_id("P1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces() {
        let layer = QueryLayer::new(TableHandle::new(Arc::new(UnreachableStore), "papers"));

        let result = layer.by_keyword("graph", 5).await;
        assert!(matches!(
            result,
            Err(QueryError::Store {
                source: StoreError::Transport(_),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_execute_reports_query() {
        let layer = loaded_layer().await;

        let outcome = layer
            .execute(&PaperQuery::Recent {
                category: "cs.AI".into(),
                limit: 3,
            })
            .await
            .unwrap();
        assert_eq!(outcome.query_type, "recent_in_category");
        assert_eq!(outcome.count, 3);
        assert_eq!(outcome.parameters["limit"], json!(3));

        let outcome = layer
            .execute(&PaperQuery::ById { id: "P1".into() })
            .await
            .unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["count"], json!(1));
        assert_eq!(json["results"][0]["abstract"], json!("graph neural networks for graph learning"));
    }

    // ============================================================
    // FRONT END
    // ============================================================

    #[tokio::test]
    async fn test_handler_recent_requires_category() {
        let layer = Arc::new(loaded_layer().await);

        let missing = handle_recent(
            Extension(layer.clone()),
            Query(RecentParams {
                category: None,
                limit: None,
            }),
        )
        .await;
        let (status, Json(body)) = missing.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("category"));

        let bad_limit = handle_recent(
            Extension(layer.clone()),
            Query(RecentParams {
                category: Some("cs.AI".into()),
                limit: Some("many".into()),
            }),
        )
        .await;
        assert_eq!(bad_limit.unwrap_err().0, StatusCode::BAD_REQUEST);

        let Json(found) = handle_recent(
            Extension(layer),
            Query(RecentParams {
                category: Some("cs.AI".into()),
                limit: Some("2".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(found.category, "cs.AI");
        assert_eq!(found.count, 2);
    }

    #[tokio::test]
    async fn test_handler_by_id_not_found() {
        let layer = Arc::new(loaded_layer().await);

        let missing = handle_by_id(Extension(layer.clone()), Path("nope".into())).await;
        assert_eq!(missing.unwrap_err().0, StatusCode::NOT_FOUND);

        let Json(detail) = handle_by_id(Extension(layer), Path("J2".into()))
            .await
            .unwrap();
        assert_eq!(detail.abstract_text, "sparse attention");
    }

    #[tokio::test]
    async fn test_handler_date_range_requires_bounds() {
        let layer = Arc::new(loaded_layer().await);

        let missing = handle_date_range(
            Extension(layer.clone()),
            Query(SearchParams {
                category: Some("cs.AI".into()),
                start: Some("2024-01-01".into()),
                end: None,
            }),
        )
        .await;
        assert_eq!(missing.unwrap_err().0, StatusCode::BAD_REQUEST);

        let Json(range) = handle_date_range(
            Extension(layer),
            Query(SearchParams {
                category: Some("cs.AI".into()),
                start: Some("2024-01-01".into()),
                end: Some("2024-01-31".into()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(range.count, 3);
        assert_eq!(range.end, "2024-01-31");
    }

    #[tokio::test]
    async fn test_handler_backend_failure_is_500() {
        let layer = Arc::new(QueryLayer::new(TableHandle::new(
            Arc::new(UnreachableStore),
            "papers",
        )));

        let result = handle_by_author(Extension(layer), Path("Ada Lovelace".into())).await;
        assert_eq!(result.unwrap_err().0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
