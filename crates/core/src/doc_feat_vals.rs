//! Per-document feature values
//!
//! A flat vector of non-term scoring signals (download counts, recency
//! and the like), one `f32` per feature, stored verbatim as supplied
//! by the caller.

use crate::enumerable::{Enumerable, EnumVec};

/// Per-feature value vector for a single document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocFeatVals<P: Enumerable> {
    vals: EnumVec<P, f32>,
}

impl<P: Enumerable> DocFeatVals<P> {
    /// Materialize from per-feature values.
    pub fn new(vals: EnumVec<P, f32>) -> Self {
        DocFeatVals { vals }
    }

    /// The value of `feature`.
    pub fn get(&self, feature: P) -> f32 {
        self.vals[feature]
    }
}
