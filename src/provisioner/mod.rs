//! Table Provisioner Module
//!
//! Idempotent "ensure schema" step run before loading or serving: describe the table, create
//! it with the paper schema when absent, then block until the store reports it active.
//! Concurrent callers racing to create the same table all converge on the same handle.

pub mod provisioner;
