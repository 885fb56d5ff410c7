//! # docdex
//!
//! An in-memory full-text search engine for browseable package and
//! documentation indexes: BM25F ranking over enumerated fields,
//! non-term scoring features, incremental index maintenance and
//! prefix lookup.
//!
//! # Quick Start
//!
//! ```
//! use docdex::{
//!     EnumVec, FeatureFunction, FeatureSchema, FieldAnalyzer, FieldSchema, Schema, SearchEngine,
//! };
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Field {
//!     Synopsis,
//!     Description,
//! }
//! docdex::enumerable!(Field { Synopsis, Description });
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Feature {
//!     Downloads,
//! }
//! docdex::enumerable!(Feature { Downloads });
//!
//! fn main() -> docdex::Result<()> {
//!     let schema = Schema::new(
//!         1.2,
//!         EnumVec::from_fn(|f| FieldSchema {
//!             weight: if f == Field::Synopsis { 2.0 } else { 1.0 },
//!             b: 0.75,
//!             analyzer: FieldAnalyzer::Plain,
//!         }),
//!         EnumVec::from_fn(|_| FeatureSchema {
//!             weight: 0.5,
//!             function: FeatureFunction::Logarithmic { shift: 1.0 },
//!         }),
//!     );
//!     let mut engine: SearchEngine<String, Field, Feature> = SearchEngine::new(schema);
//!
//!     engine.insert_doc(
//!         "aeson".to_string(),
//!         EnumVec::from_fn(|f| {
//!             match f {
//!                 Field::Synopsis => "Fast JSON parsing and encoding",
//!                 Field::Description => "A JSON library optimized for performance",
//!             }
//!             .to_string()
//!         }),
//!         EnumVec::filled(120_000.0),
//!     )?;
//!
//!     let hits = engine.query("json encoding", 10)?;
//!     assert_eq!(hits[0].0, "aeson");
//!     assert_eq!(engine.suggest("enc", 5), vec!["encod"]);
//!     Ok(())
//! }
//! ```
//!
//! # Subsystems
//!
//! | Piece | Purpose | Key Items |
//! |-------|---------|-----------|
//! | **Index** | Term/document maps, prefix lookup | [`SearchIndex`], [`DocIdSet`] |
//! | **Ranker** | BM25F scores and explanations | [`RankParams`], [`Explanation`] |
//! | **Extractor** | Tokenize, casefold, stem | [`synopsis_terms`], [`Markup`] |
//! | **Facade** | Insert, delete, query, suggest | [`SearchEngine`], [`Schema`] |
//!
//! The engine is a live in-memory structure: no persistence, no I/O,
//! no interior concurrency. Writers hold it exclusively; readers may
//! share a snapshot.

// Re-export the public API of the member crates
pub use docdex_engine::{engine, index, markup, rank, schema, tokenizer};

pub use docdex_core::{
    enumerable, DocFeatVals, DocId, DocIdSet, DocTermIds, EngineError, EnumVec, Enumerable,
    Result, Term, TermId, Variants,
};
pub use docdex_engine::{
    description_terms, english_stop_words, synopsis_terms, unique_terms, BulkScorer, Corpus,
    DocInfo, Explanation, FeatureFunction, FeatureSchema, FieldAnalyzer, FieldSchema,
    InlineCodePolicy, Markup, MarkupParser, RankParams, RankedDoc, Schema, SearchEngine,
    SearchIndex, TermInfo,
};
