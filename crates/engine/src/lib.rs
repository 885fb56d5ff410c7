//! In-memory full-text search engine
//!
//! This crate assembles the three subsystems behind the docdex facade:
//! - `index`: inverted index with bidirectional term/document maps
//! - `rank`: BM25F scoring with non-term features and explanations
//! - `tokenizer` / `markup`: text extraction for synopsis strings and
//!   documentation markup trees
//! - `schema` / `engine`: construction-time configuration and the
//!   public insert/delete/query surface
//!
//! The engine holds everything in memory, performs no I/O and runs
//! every operation to completion; writers serialize externally.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod index;
pub mod markup;
pub mod rank;
pub mod schema;
pub mod tokenizer;

pub use engine::{MarkupParser, SearchEngine};
pub use index::{DocInfo, SearchIndex, TermInfo};
pub use markup::{InlineCodePolicy, Markup};
pub use rank::{BulkScorer, Corpus, Explanation, FeatureFunction, RankParams, RankedDoc};
pub use schema::{FeatureSchema, FieldAnalyzer, FieldSchema, Schema};
pub use tokenizer::{description_terms, english_stop_words, synopsis_terms, unique_terms};
