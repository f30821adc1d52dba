use super::partitioner::WorkerPartitioner;
use super::types::{LoadError, LoadSummary, LoaderConfig};
use crate::document::normalizer::normalize;
use crate::document::source::stream_documents;
use crate::document::types::{Paper, RawRecord};
use crate::items::builder::build_items;
use crate::items::types::{IndexItem, KindCounts};
use crate::keywords::extractor::KeywordExtractor;
use crate::storage::retry::{RetryPolicy, with_retry};
use crate::storage::store::TableHandle;
use crate::storage::types::{Item, StoreError};

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use uuid::Uuid;

/// Documents queued per worker before the reader waits.
const WORKER_QUEUE_CAPACITY: usize = 256;

/// Raw records queued between the file reader and the loader.
const RECORD_QUEUE_CAPACITY: usize = 1024;

/// Where the loader pulls raw records from.
trait RecordSource {
    fn next_record(&mut self) -> impl Future<Output = Option<RawRecord>> + Send;
}

struct IterSource<I>(I);

impl<I: Iterator<Item = RawRecord>> RecordSource for IterSource<I> {
    fn next_record(&mut self) -> impl Future<Output = Option<RawRecord>> + Send {
        std::future::ready(self.0.next())
    }
}

/// Records decoded by a reader task.
struct ChannelSource(mpsc::Receiver<RawRecord>);

impl RecordSource for ChannelSource {
    fn next_record(&mut self) -> impl Future<Output = Option<RawRecord>> + Send {
        self.0.recv()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct WorkerStats {
    documents: usize,
    items_written: usize,
    counts: KindCounts,
}

impl WorkerStats {
    fn merge(&mut self, other: &WorkerStats) {
        self.documents += other.documents;
        self.items_written += other.items_written;
        self.counts.merge(&other.counts);
    }
}

/// One independent write buffer.
struct LoadWorker {
    worker_id: usize,
    table: TableHandle,
    extractor: Arc<KeywordExtractor>,
    batch_size: usize,
    write_chunk: usize,
    retry: RetryPolicy,
    buffer: Vec<Item>,
    stats: WorkerStats,
}

impl LoadWorker {
    async fn accept(&mut self, paper: Paper) -> Result<(), StoreError> {
        let keywords = self.extractor.extract(&paper.abstract_text);
        let fan_out = build_items(&paper, &keywords);

        self.stats.documents += 1;
        self.stats.counts.merge(&fan_out.counts);
        self.buffer
            .extend(fan_out.items.iter().map(IndexItem::to_item));

        if self.buffer.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), StoreError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let batch = std::mem::take(&mut self.buffer);
        let table = &self.table;
        for chunk in batch.chunks(self.write_chunk) {
            with_retry(&self.retry, "batch write", move || table.batch_write(chunk)).await?;
            self.stats.items_written += chunk.len();
        }

        tracing::debug!(
            worker = self.worker_id,
            "Flushed {} items ({} written so far)",
            batch.len(),
            self.stats.items_written
        );
        Ok(())
    }

    async fn finish(mut self) -> Result<WorkerStats, StoreError> {
        self.flush().await?;
        Ok(self.stats)
    }
}

/// Writes the fan-out of a document stream into a schema-ready table.
pub struct BulkLoader {
    table: TableHandle,
    config: LoaderConfig,
    extractor: Arc<KeywordExtractor>,
}

impl BulkLoader {
    pub fn new(table: TableHandle, config: LoaderConfig) -> Self {
        let extractor = Arc::new(KeywordExtractor::new(config.keywords.clone()));
        Self {
            table,
            config,
            extractor,
        }
    }

    /// Streams a JSON document file through the pipeline.
    ///
    /// A blocking task decodes records one at a time into a bounded queue, so memory stays
    /// bounded however large the file is. Records read before a decode error are loaded.
    pub async fn load_path(&self, path: &Path) -> Result<LoadSummary, LoadError> {
        tracing::info!("Loading papers from {}", path.display());

        let (tx, rx) = mpsc::channel::<RawRecord>(RECORD_QUEUE_CAPACITY);
        let path = path.to_path_buf();
        let reader = tokio::task::spawn_blocking(move || {
            stream_documents(&path, |record| tx.blocking_send(record).is_ok())
        });

        let loaded = self.run(ChannelSource(rx)).await;
        let read = reader
            .await
            .map_err(|e| LoadError::Worker(e.to_string()))?;

        // A failed load stops the reader, so the load error comes first.
        let summary = loaded?;
        let read_count = read?;
        tracing::debug!("Read {} records", read_count);
        Ok(summary)
    }

    pub async fn load<I>(&self, records: I) -> Result<LoadSummary, LoadError>
    where
        I: IntoIterator<Item = RawRecord>,
    {
        self.run(IterSource(records.into_iter())).await
    }

    async fn run<S: RecordSource>(&self, records: S) -> Result<LoadSummary, LoadError> {
        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();
        tracing::info!(
            run_id = %run_id,
            "Loading into table {} with {} worker(s), flushing every {} items",
            self.table.name(),
            self.config.workers.max(1),
            self.config.batch_size
        );

        let (stats, dropped) = if self.config.workers > 1 {
            self.load_partitioned(records).await?
        } else {
            self.load_sequential(records).await?
        };

        Ok(LoadSummary {
            run_id,
            documents_processed: stats.documents,
            documents_dropped: dropped,
            items_written: stats.items_written,
            counts: stats.counts,
            elapsed: started.elapsed(),
        })
    }

    fn worker(&self, worker_id: usize) -> LoadWorker {
        LoadWorker {
            worker_id,
            table: self.table.clone(),
            extractor: self.extractor.clone(),
            batch_size: self.config.batch_size.max(1),
            write_chunk: self.config.write_chunk.max(1),
            retry: self.config.retry,
            buffer: Vec::new(),
            stats: WorkerStats::default(),
        }
    }

    async fn load_sequential<S: RecordSource>(
        &self,
        mut records: S,
    ) -> Result<(WorkerStats, usize), LoadError> {
        let mut worker = self.worker(0);
        let mut dropped = 0usize;

        while let Some(record) = records.next_record().await {
            match normalize(&record) {
                Some(paper) => worker.accept(paper).await?,
                None => {
                    dropped += 1;
                    tracing::debug!("Dropping record without a recognized id");
                }
            }
        }

        Ok((worker.finish().await?, dropped))
    }

    async fn load_partitioned<S: RecordSource>(
        &self,
        mut records: S,
    ) -> Result<(WorkerStats, usize), LoadError> {
        let partitioner = WorkerPartitioner::new(self.config.workers);
        let mut senders = Vec::with_capacity(partitioner.num_workers());
        let mut workers = JoinSet::new();

        for worker_id in 0..partitioner.num_workers() {
            let (tx, mut rx) = mpsc::channel::<Paper>(WORKER_QUEUE_CAPACITY);
            let mut worker = self.worker(worker_id);
            workers.spawn(async move {
                while let Some(paper) = rx.recv().await {
                    worker.accept(paper).await?;
                }
                worker.finish().await
            });
            senders.push(tx);
        }

        let mut dropped = 0usize;
        while let Some(record) = records.next_record().await {
            let Some(paper) = normalize(&record) else {
                dropped += 1;
                tracing::debug!("Dropping record without a recognized id");
                continue;
            };
            let target = partitioner.worker_for(&paper.arxiv_id);
            if senders[target].send(paper).await.is_err() {
                // The worker stopped on an error; it is collected below.
                break;
            }
        }
        drop(senders);

        let mut total = WorkerStats::default();
        let mut failure: Option<LoadError> = None;
        while let Some(joined) = workers.join_next().await {
            let outcome = match joined {
                Ok(Ok(stats)) => {
                    total.merge(&stats);
                    continue;
                }
                Ok(Err(e)) => LoadError::Store(e),
                Err(e) if e.is_cancelled() => continue,
                Err(e) => LoadError::Worker(e.to_string()),
            };
            if failure.is_none() {
                tracing::error!("Aborting load: {}", outcome);
                workers.abort_all();
                failure = Some(outcome);
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok((total, dropped)),
        }
    }
}
