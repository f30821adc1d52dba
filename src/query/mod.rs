//! Query Layer Module
//!
//! Five read operations over the paper table. Each one is answered by a single lookup on one
//! index partition; nothing is joined client-side because every item already carries the
//! fields its result needs.
//!
//! | Operation | Index | Partition | Order |
//! |---|---|---|---|
//! | `recent_in_category` | table | `CATEGORY#<cat>` | newest first |
//! | `by_author` | `AuthorIndex` | `AUTHOR#<name>` | oldest first |
//! | `by_id` | `PaperIdIndex` | `PAPER#<id>` | first match |
//! | `date_range` | table | `CATEGORY#<cat>` | oldest first |
//! | `by_keyword` | `KeywordIndex` | `KEYWORD#<kw>` | newest first |
//!
//! Unmatched lookups and a missing table yield empty results, never errors.

pub mod handlers;
pub mod query;
pub mod types;

#[cfg(test)]
mod tests;
