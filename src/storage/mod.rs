//! Table Storage Module
//!
//! A partitioned key-value table store with a handful of secondary indexes, each keyed by a
//! single partition attribute and a single sort attribute.
//!
//! ## Core Concepts
//! - **Store handle**: `TableStore` is the only seam between the pipeline and the backend.
//!   Components receive an explicit `TableHandle` (store + table name) at construction.
//! - **Partitions**: items sharing a partition key are kept sort-ordered, enabling
//!   newest-first and range scans inside one partition.
//! - **Sparse indexes**: an item appears in a secondary index only when it carries both of
//!   that index's key attributes.
//! - **Overwrite by key**: writing an existing primary key replaces the item and its index
//!   entries, so replaying a batch is harmless.
//!
//! ## Backends
//! - **`memory`**: in-process `MemoryStore`.
//! - **`handlers`** / **`remote`**: the same store served over HTTP by a store node, and the
//!   client that talks to it.

pub mod handlers;
pub mod memory;
pub mod protocol;
pub mod remote;
pub mod retry;
pub mod store;
pub mod types;
