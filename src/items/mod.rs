//! Fan-out Item Builder Module
//!
//! Derives the full set of denormalized index items for one normalized document.
//!
//! ## Item Kinds
//! Each document fans out into:
//! - one **paper** item (`PAPER#<id>` / `PAPER`), also indexed on `PaperIdIndex`,
//! - one **category** item per category (`CATEGORY#<cat>` / `<date>#<id>`),
//! - one **author** item per normalized author, duplicated onto `AuthorIndex`,
//! - one **keyword** item per extracted keyword, duplicated onto `KeywordIndex`.
//!
//! Building is a pure function of the document and its keyword list, so re-ingesting the same
//! document produces byte-identical items and overwrites them in place.

pub mod builder;
pub mod keys;
pub mod types;

#[cfg(test)]
mod tests;
