//! Denormalized Paper Index Library
//!
//! This library crate ingests bibliographic records into a single partitioned table and
//! answers five access patterns, each with one index lookup. It serves as the foundation for
//! the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! Data flows leaf-first through the subsystems below:
//!
//! - **`document`**: Reads JSON sources and normalizes heterogeneous records (aliased ids,
//!   free-form dates, messy author lists) into `Paper`s.
//! - **`keywords`**: Tokenizes abstracts and keeps the most frequent non-stopword terms,
//!   manufacturing the keyword query dimension.
//! - **`items`**: The fan-out builder. A pure function from one paper and its keywords to the
//!   full set of index items with deterministic composite keys.
//! - **`storage`**: The `TableStore` abstraction with an in-process backend, an HTTP store
//!   node, its client, and retry with backoff.
//! - **`provisioner`**: Creates the table and its secondary indexes on first use and waits
//!   until it is active.
//! - **`loader`**: Streams documents through the pipeline and flushes items in bounded,
//!   idempotent batches, optionally across several workers.
//! - **`query`**: The read side and its HTTP front end.
//! - **`config`** / **`telemetry`**: Binary configuration and logging.

pub mod config;
pub mod document;
pub mod items;
pub mod keywords;
pub mod loader;
pub mod provisioner;
pub mod query;
pub mod storage;
pub mod telemetry;
