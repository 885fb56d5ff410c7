//! Internal identifier types
//!
//! Documents and terms are identified internally by dense `u32` ids.
//! Ids are allocated from a monotonic counter and are never reused
//! within the lifetime of an index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense internal identifier for a document.
///
/// Allocated on first insert of a new document key; stable until the
/// document is deleted. Deleted ids are not recycled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocId(u32);

impl DocId {
    /// Wrap a raw id.
    pub const fn new(raw: u32) -> Self {
        DocId(raw)
    }

    /// The raw id value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The id as a dense array index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The next id in allocation order.
    pub const fn succ(self) -> Self {
        DocId(self.0 + 1)
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// Dense internal identifier for a term.
///
/// Allocated on the first occurrence of a term in any document and
/// released (but not recycled) once no document contains the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TermId(u32);

impl TermId {
    /// Wrap a raw id.
    pub const fn new(raw: u32) -> Self {
        TermId(raw)
    }

    /// The raw id value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// The next id in allocation order.
    pub const fn succ(self) -> Self {
        TermId(self.0 + 1)
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_id_succ_is_monotonic() {
        let d = DocId::new(0);
        assert!(d.succ() > d);
        assert_eq!(d.succ().get(), 1);
    }

    #[test]
    fn test_ids_order_by_raw_value() {
        assert!(TermId::new(3) < TermId::new(10));
        assert!(DocId::new(3) < DocId::new(10));
    }

    #[test]
    fn test_display() {
        assert_eq!(DocId::new(7).to_string(), "d7");
        assert_eq!(TermId::new(7).to_string(), "t7");
    }
}
