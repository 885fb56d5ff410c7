//! Core types for the docdex search engine
//!
//! This crate defines the foundational types:
//! - `DocId` / `TermId`: dense internal identifiers
//! - `Enumerable` / `EnumVec`: finite alphabets and dense per-ordinal storage
//! - `DocIdSet`: sorted-unique document id sets with merge-walk algebra
//! - `DocTermIds`: per-document, per-field term-id sequences
//! - `DocFeatVals`: per-document feature vectors
//! - `EngineError`: the invariant-violation error type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod doc_feat_vals;
pub mod doc_id_set;
pub mod doc_term_ids;
pub mod enumerable;
pub mod error;
pub mod ids;

pub use doc_feat_vals::DocFeatVals;
pub use doc_id_set::DocIdSet;
pub use doc_term_ids::DocTermIds;
pub use enumerable::{Enumerable, EnumVec, Variants};
pub use error::{EngineError, Result};
pub use ids::{DocId, TermId};

/// A normalized (case-folded, stemmed) index term.
pub type Term = String;
