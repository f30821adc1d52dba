//! Full load -> query path against a store node over loopback HTTP.

use paper_index::loader::loader::BulkLoader;
use paper_index::loader::types::LoaderConfig;
use paper_index::provisioner::provisioner::TableProvisioner;
use paper_index::query::query::QueryLayer;
use paper_index::storage::handlers::{StoreNode, router};
use paper_index::storage::memory::MemoryStore;
use paper_index::storage::remote::RemoteStore;
use paper_index::storage::store::TableStore;
use paper_index::storage::types::{StoreError, TableStatus};
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

async fn spawn_store_node(region: Option<&str>) -> String {
    let app = router(StoreNode::new(
        Arc::new(MemoryStore::new()),
        region.map(str::to_string),
    ));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn papers_file() -> tempfile::NamedTempFile {
    let papers = json!([
        {
            "arxiv_id": "2403.00001",
            "title": "Graph Learning",
            "categories": ["cs.AI", "cs.LG"],
            "authors": ["Ada Lovelace"],
            "abstract": "graph neural networks for graph learning",
            "published": "2024-03-01T00:00:00Z"
        },
        {
            "arxivId": "2401.00002",
            "title": "  Sparse Attention  ",
            "categories": ["cs.LG"],
            "authors": ["Jane Doe", " "],
            "abstract": "sparse attention for long documents",
            "published_at": "2024-01-10"
        },
        {"title": "no id here"}
    ]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", papers).unwrap();
    file
}

#[tokio::test]
async fn load_and_query_through_store_node() {
    let url = spawn_store_node(None).await;
    let store: Arc<dyn TableStore> = Arc::new(RemoteStore::new(&url, None));

    let table = TableProvisioner::new(store.clone())
        .ensure_table("arxiv-papers")
        .await
        .unwrap();
    let description = table.describe().await.unwrap();
    assert_eq!(description.status, TableStatus::Active);
    assert_eq!(description.schema.indexes.len(), 3);

    let file = papers_file();
    let summary = BulkLoader::new(table.clone(), LoaderConfig::default())
        .load_path(file.path())
        .await
        .unwrap();
    assert_eq!(summary.documents_processed, 2);
    assert_eq!(summary.documents_dropped, 1);
    assert_eq!(table.describe().await.unwrap().item_count, summary.items_written);

    let layer = QueryLayer::new(table.clone());
    let detail = layer.by_id("2401.00002").await.unwrap().unwrap();
    assert_eq!(detail.summary.title, "Sparse Attention");
    assert_eq!(detail.summary.authors, vec!["Jane Doe"]);

    let recent = layer.recent_in_category("cs.LG", 10).await.unwrap();
    let ids: Vec<&str> = recent.iter().map(|p| p.arxiv_id.as_str()).collect();
    assert_eq!(ids, vec!["2403.00001", "2401.00002"]);

    let by_keyword = layer.by_keyword("sparse", 5).await.unwrap();
    assert_eq!(by_keyword.len(), 1);

    // A second provisioning call reuses the table and a reload adds nothing.
    let again = TableProvisioner::new(store)
        .ensure_table("arxiv-papers")
        .await
        .unwrap();
    BulkLoader::new(again, LoaderConfig::default())
        .load_path(file.path())
        .await
        .unwrap();
    assert_eq!(table.describe().await.unwrap().item_count, summary.items_written);
}

#[tokio::test]
async fn concurrent_provisioning_over_http() {
    let url = spawn_store_node(None).await;
    let first = TableProvisioner::new(Arc::new(RemoteStore::new(&url, None)));
    let second = TableProvisioner::new(Arc::new(RemoteStore::new(&url, None)));

    let (a, b) = tokio::join!(first.ensure_table("shared"), second.ensure_table("shared"));

    assert_eq!(a.unwrap().name(), "shared");
    assert_eq!(b.unwrap().name(), "shared");
}

#[tokio::test]
async fn missing_table_queries_read_empty() {
    let url = spawn_store_node(None).await;
    let store: Arc<dyn TableStore> = Arc::new(RemoteStore::new(&url, None));

    let err = store.describe_table("absent").await.unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(_)));

    let layer = QueryLayer::new(paper_index::storage::store::TableHandle::new(store, "absent"));
    assert!(layer.by_author("anyone").await.unwrap().is_empty());
}

#[tokio::test]
async fn region_mismatch_is_rejected() {
    let url = spawn_store_node(Some("eu-west-1")).await;

    let wrong = RemoteStore::new(&url, Some("us-west-2".into()));
    let err = wrong.describe_table("papers").await.unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
    assert!(!err.is_transient());

    let right = RemoteStore::new(&url, Some("eu-west-1".into()));
    let err = right.describe_table("papers").await.unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound(_)));
}

#[tokio::test]
async fn unreachable_node_is_transient() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = RemoteStore::new(&addr.to_string(), None);
    let err = store.describe_table("papers").await.unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn slow_node_times_out_as_transient() {
    // Accepts connections but never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let store = RemoteStore::new(&addr.to_string(), None).with_timeout(Duration::from_millis(100));
    let started = Instant::now();
    let err = store.describe_table("papers").await.unwrap_err();

    assert!(err.is_transient());
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn oversized_batch_is_rejected() {
    let url = spawn_store_node(None).await;
    let store: Arc<dyn TableStore> = Arc::new(RemoteStore::new(&url, None));
    let table = TableProvisioner::new(store).ensure_table("papers").await.unwrap();

    let items: Vec<_> = (0..26)
        .map(|i| {
            let Value::Object(item) = json!({"PK": format!("PAPER#{}", i), "SK": "PAPER"}) else {
                unreachable!()
            };
            item
        })
        .collect();

    let err = table.batch_write(&items).await.unwrap_err();
    assert!(matches!(err, StoreError::Rejected(_)));
}
