//! Loader configuration, statistics and errors.

use crate::items::types::{ItemKind, KindCounts};
use crate::keywords::extractor::KeywordConfig;
use crate::storage::memory::MAX_BATCH_ITEMS;
use crate::storage::retry::RetryPolicy;
use crate::storage::types::StoreError;

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Buffered items that trigger a flush.
    pub batch_size: usize,
    /// Items per store request; a flush is split into requests of this size.
    pub write_chunk: usize,
    pub workers: usize,
    pub retry: RetryPolicy,
    pub keywords: KeywordConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            write_chunk: MAX_BATCH_ITEMS,
            workers: 1,
            retry: RetryPolicy::default(),
            keywords: KeywordConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read document source '{path}': {source}")]
    Source {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("unsupported document source format: expected a JSON array or an object with a \"papers\" array")]
    UnsupportedFormat,
    #[error("batch write failed: {0}")]
    Store(#[from] StoreError),
    #[error("load worker failed: {0}")]
    Worker(String),
}

/// Outcome of one load run.
#[derive(Debug, Clone, Serialize)]
pub struct LoadSummary {
    pub run_id: String,
    pub documents_processed: usize,
    pub documents_dropped: usize,
    pub items_written: usize,
    pub counts: KindCounts,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

impl LoadSummary {
    /// Items written per loaded document.
    pub fn denormalization_factor(&self) -> f64 {
        if self.documents_processed == 0 {
            return 0.0;
        }
        self.items_written as f64 / self.documents_processed as f64
    }

    pub fn per_document(&self, kind: ItemKind) -> f64 {
        if self.documents_processed == 0 {
            return 0.0;
        }
        self.counts.get(kind) as f64 / self.documents_processed as f64
    }

    /// Emits the operator-facing summary to the log stream.
    pub fn log(&self) {
        tracing::info!(run_id = %self.run_id, "Loaded {} papers", self.documents_processed);
        if self.documents_dropped > 0 {
            tracing::info!(
                run_id = %self.run_id,
                "Dropped {} records without an id",
                self.documents_dropped
            );
        }
        tracing::info!(
            run_id = %self.run_id,
            "Created {} denormalized items (denormalization factor {:.1}x)",
            self.items_written,
            self.denormalization_factor()
        );
        for kind in ItemKind::ALL {
            tracing::info!(
                run_id = %self.run_id,
                "  {} items: {} ({:.1} per paper avg)",
                kind.label(),
                self.counts.get(kind),
                self.per_document(kind)
            );
        }
        tracing::info!(run_id = %self.run_id, "Took {} ms", self.elapsed.as_millis());
    }
}

fn as_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}
