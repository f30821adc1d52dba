use anyhow::Context;
use clap::Parser;
use paper_index::config::{Cli, Command, StoreArgs};
use paper_index::keywords::extractor::KeywordConfig;
use paper_index::loader::loader::BulkLoader;
use paper_index::loader::types::LoaderConfig;
use paper_index::provisioner::provisioner::TableProvisioner;
use paper_index::query::handlers;
use paper_index::query::query::QueryLayer;
use paper_index::query::types::PaperQuery;
use paper_index::storage::handlers::{StoreNode, router};
use paper_index::storage::memory::MemoryStore;
use paper_index::storage::store::TableHandle;
use paper_index::telemetry::init_tracing;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Load {
            path,
            table,
            store,
            workers,
            batch_size,
            max_keywords,
            stopwords,
        } => {
            let mut keywords = KeywordConfig::default().with_max_keywords(max_keywords);
            if let Some(file) = stopwords {
                let added = keywords
                    .extend_stopwords_from_file(&file)
                    .with_context(|| format!("reading stopwords from {}", file.display()))?;
                tracing::info!("Added {} stopwords from {}", added, file.display());
            }
            let config = LoaderConfig {
                workers,
                batch_size,
                keywords,
                ..LoaderConfig::default()
            };
            run_load(&path, &table, &store, config).await
        }
        Command::Serve {
            bind,
            table,
            store,
            preload,
        } => run_serve(bind, &table, &store, preload).await,
        Command::StoreNode { bind, region } => run_store_node(bind, region).await,
        Command::Query {
            table,
            store,
            preload,
            query,
        } => run_query(&table, &store, preload, query.into()).await,
    }
}

async fn run_load(
    path: &Path,
    table: &str,
    store: &StoreArgs,
    config: LoaderConfig,
) -> anyhow::Result<()> {
    let handle = TableProvisioner::new(store.open())
        .ensure_table(table)
        .await
        .with_context(|| format!("provisioning table {}", table))?;

    let summary = BulkLoader::new(handle, config).load_path(path).await?;
    summary.log();

    if !store.is_remote() {
        tracing::warn!("No --store given: loaded into an in-process store that exits with this command");
    }
    Ok(())
}

/// Opens the table, loading `preload` into it first when given.
async fn open_table(
    table: &str,
    store: &StoreArgs,
    preload: Option<PathBuf>,
) -> anyhow::Result<TableHandle> {
    let backend = store.open();
    match preload {
        Some(path) => {
            let handle = TableProvisioner::new(backend).ensure_table(table).await?;
            let summary = BulkLoader::new(handle.clone(), LoaderConfig::default())
                .load_path(&path)
                .await?;
            summary.log();
            Ok(handle)
        }
        None => Ok(TableHandle::new(backend, table)),
    }
}

async fn run_serve(
    bind: SocketAddr,
    table: &str,
    store: &StoreArgs,
    preload: Option<PathBuf>,
) -> anyhow::Result<()> {
    let handle = open_table(table, store, preload).await?;
    let app = handlers::router(Arc::new(QueryLayer::new(handle)));

    tracing::info!("Query API listening on {} using table '{}'", bind, table);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_store_node(bind: SocketAddr, region: Option<String>) -> anyhow::Result<()> {
    tracing::info!(
        "Store node listening on {} (region {})",
        bind,
        region.as_deref().unwrap_or("any")
    );
    let app = router(StoreNode::new(Arc::new(MemoryStore::new()), region));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn run_query(
    table: &str,
    store: &StoreArgs,
    preload: Option<PathBuf>,
    query: PaperQuery,
) -> anyhow::Result<()> {
    let handle = open_table(table, store, preload).await?;
    let outcome = QueryLayer::new(handle).execute(&query).await?;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
