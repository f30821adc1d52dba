//! Command-line and environment configuration for the `paper-index` binary.

use crate::query::types::{DEFAULT_LIMIT, PaperQuery};
use crate::storage::memory::MemoryStore;
use crate::storage::remote::{DEFAULT_TIMEOUT, RemoteStore};
use crate::storage::store::TableStore;

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "arxiv-papers";
pub const DEFAULT_QUERY_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_STORE_BIND: &str = "0.0.0.0:7700";

#[derive(Debug, Parser)]
#[command(name = "paper-index")]
#[command(about = "Load bibliographic records into a multi-index table and query them")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where the table lives.
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Base URL of a store node; an in-process store is used when omitted
    #[arg(long, env = "PAPER_STORE_URL")]
    pub store: Option<String>,

    /// Region label the store node must serve
    #[arg(long, env = "PAPER_STORE_REGION")]
    pub region: Option<String>,

    /// Per-request timeout against the store node, in milliseconds
    #[arg(long, env = "PAPER_STORE_TIMEOUT_MS", default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,
}

impl StoreArgs {
    pub fn is_remote(&self) -> bool {
        self.store.is_some()
    }

    pub fn open(&self) -> Arc<dyn TableStore> {
        match &self.store {
            Some(url) => {
                tracing::info!(
                    "Using store node {} (region {})",
                    url,
                    self.region.as_deref().unwrap_or("default")
                );
                Arc::new(
                    RemoteStore::new(url, self.region.clone())
                        .with_timeout(Duration::from_millis(self.timeout_ms)),
                )
            }
            None => {
                tracing::info!("Using in-process store");
                Arc::new(MemoryStore::new())
            }
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a JSON file of papers into a table, creating the table if needed
    Load {
        /// JSON file: an array of records or an object with a "papers" array
        path: PathBuf,

        /// Target table name
        table: String,

        #[command(flatten)]
        store: StoreArgs,

        /// Concurrent write workers
        #[arg(long, default_value_t = 1)]
        workers: usize,

        /// Buffered items per flush
        #[arg(long, default_value_t = crate::loader::types::DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Keywords extracted per abstract
        #[arg(long, default_value_t = crate::keywords::extractor::DEFAULT_MAX_KEYWORDS)]
        max_keywords: usize,

        /// Extra stopwords, one per line
        #[arg(long)]
        stopwords: Option<PathBuf>,
    },

    /// Serve the paper query API over HTTP
    Serve {
        #[arg(long, env = "PAPER_BIND", default_value = DEFAULT_QUERY_BIND)]
        bind: SocketAddr,

        #[arg(long, env = "PAPER_TABLE", default_value = DEFAULT_TABLE)]
        table: String,

        #[command(flatten)]
        store: StoreArgs,

        /// Load this JSON file before serving
        #[arg(long)]
        preload: Option<PathBuf>,
    },

    /// Run a table store node
    StoreNode {
        #[arg(long, env = "PAPER_BIND", default_value = DEFAULT_STORE_BIND)]
        bind: SocketAddr,

        /// Region served by this node; requests for other regions are refused
        #[arg(long, env = "PAPER_STORE_REGION")]
        region: Option<String>,
    },

    /// Run one query and print the result as JSON
    Query {
        #[arg(long, env = "PAPER_TABLE", default_value = DEFAULT_TABLE)]
        table: String,

        #[command(flatten)]
        store: StoreArgs,

        /// Load this JSON file into the in-process store first
        #[arg(long)]
        preload: Option<PathBuf>,

        #[command(subcommand)]
        query: QueryCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum QueryCommand {
    /// Newest papers in a category
    Recent {
        category: String,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
    /// Every paper by an author
    Author { name: String },
    /// One paper with its abstract
    Get { id: String },
    /// Papers in a category published between two dates, inclusive
    Daterange {
        category: String,
        start: String,
        end: String,
    },
    /// Newest papers carrying a keyword
    Keyword {
        keyword: String,
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
}

impl From<QueryCommand> for PaperQuery {
    fn from(command: QueryCommand) -> Self {
        match command {
            QueryCommand::Recent { category, limit } => PaperQuery::Recent { category, limit },
            QueryCommand::Author { name } => PaperQuery::ByAuthor { name },
            QueryCommand::Get { id } => PaperQuery::ById { id },
            QueryCommand::Daterange {
                category,
                start,
                end,
            } => PaperQuery::DateRange {
                category,
                start,
                end,
            },
            QueryCommand::Keyword { keyword, limit } => PaperQuery::ByKeyword { keyword, limit },
        }
    }
}
