//! Keyword Extraction Module
//!
//! Manufactures the keyword query dimension: the abstract text carries no keyword field, so
//! each document gets a bounded list of its most frequent content words.
//!
//! ## Submodules
//! - **`tokenizer`**: splits free text into lowercase word tokens.
//! - **`extractor`**: filters stopwords and short tokens, ranks by frequency, keeps the top K.

pub mod extractor;
pub mod tokenizer;
