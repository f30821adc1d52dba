//! Document Intake Module
//!
//! Turns loosely-structured bibliographic records into canonical `Paper` values.
//!
//! ## Workflow
//! 1. **Read**: `source` decodes a JSON file holding either a bare array of records or an
//!    object with a `"papers"` array.
//! 2. **Normalize**: `normalizer` resolves aliased fields (id, publication date), trims
//!    author/category lists and reduces timestamps to a date-only string.
//!
//! Records without a usable id are dropped here and never reach the item builder.

pub mod normalizer;
pub mod source;
pub mod types;
