//! Per-document term storage
//!
//! `DocTermIds` holds, for one document, the ordered sequence of term
//! ids per field. Order preserves extraction order and duplicates are
//! allowed; occurrence counts feed term-frequency statistics. The
//! per-field lists are immutable once built and are replaced wholesale
//! when a document is updated.

use crate::enumerable::{Enumerable, EnumVec};
use crate::ids::TermId;

/// Ordered per-field term-id sequences for a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTermIds<F: Enumerable> {
    fields: EnumVec<F, Box<[TermId]>>,
}

impl<F: Enumerable> DocTermIds<F> {
    /// Materialize from per-field id lists.
    pub fn new(fields: EnumVec<F, Vec<TermId>>) -> Self {
        DocTermIds {
            fields: fields.map(|_, ids| ids.clone().into_boxed_slice()),
        }
    }

    /// Number of term occurrences in `field`.
    pub fn field_len(&self, field: F) -> usize {
        self.fields[field].len()
    }

    /// The term ids of `field`, in extraction order.
    pub fn field_terms(&self, field: F) -> &[TermId] {
        &self.fields[field]
    }

    /// How many times `id` occurs in `field`.
    pub fn field_term_count(&self, field: F, id: TermId) -> usize {
        self.fields[field].iter().filter(|&&t| t == id).count()
    }

    /// Iterate every term id across all fields.
    pub fn iter_all(&self) -> impl Iterator<Item = TermId> + '_ {
        self.fields.iter().flat_map(|(_, ids)| ids.iter().copied())
    }
}
