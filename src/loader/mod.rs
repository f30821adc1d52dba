//! Bulk Loader Module
//!
//! Streams raw documents through normalize -> extract keywords -> fan out, buffering the
//! resulting items and flushing them to the table in bounded batches.
//!
//! ## Guarantees
//! - **Bounded memory**: at most `batch_size` items are buffered per worker.
//! - **Idempotent**: items are upserted by key, so rerunning a load over the same input leaves
//!   the row count unchanged.
//! - **Fail fast**: a batch that still fails after retrying transient errors aborts the load.
//!
//! ## Submodules
//! - **`loader`**: `BulkLoader` and its per-worker buffer.
//! - **`partitioner`**: stable routing of documents to workers.
//! - **`types`**: configuration, the load summary and `LoadError`.

pub mod loader;
pub mod partitioner;
pub mod types;
