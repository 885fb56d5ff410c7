//! Compact sets of document ids
//!
//! A `DocIdSet` is a sorted, duplicate-free sequence of [`DocId`]s.
//! Set algebra runs as a linear merge walk over both operands; point
//! insert/remove shift the tail and are intended for small deltas
//! (callers diff old/new term sets and apply the difference).

use crate::ids::DocId;
use serde::{Deserialize, Serialize};

/// Sorted ascending, duplicate-free set of document ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocIdSet {
    ids: Vec<DocId>,
}

impl DocIdSet {
    /// The empty set.
    pub fn new() -> Self {
        DocIdSet::default()
    }

    /// A set holding exactly one id.
    pub fn singleton(id: DocId) -> Self {
        DocIdSet { ids: vec![id] }
    }

    /// Number of ids in the set.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether `id` is a member.
    pub fn contains(&self, id: DocId) -> bool {
        self.ids.binary_search(&id).is_ok()
    }

    /// Insert `id`, keeping order. Returns whether the set changed.
    pub fn insert(&mut self, id: DocId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.ids.insert(pos, id);
                true
            }
        }
    }

    /// Remove `id`. Returns whether the set changed.
    pub fn remove(&mut self, id: DocId) -> bool {
        match self.ids.binary_search(&id) {
            Ok(pos) => {
                self.ids.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Iterate members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.ids.iter().copied()
    }

    /// The members as a sorted slice.
    pub fn as_slice(&self) -> &[DocId] {
        &self.ids
    }

    /// Union of two sets.
    pub fn union(&self, other: &DocIdSet) -> DocIdSet {
        let mut out = Vec::with_capacity(self.len() + other.len());
        let (mut a, mut b) = (self.ids.iter().peekable(), other.ids.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (Some(&&x), Some(&&y)) => {
                    if x < y {
                        out.push(x);
                        a.next();
                    } else if y < x {
                        out.push(y);
                        b.next();
                    } else {
                        out.push(x);
                        a.next();
                        b.next();
                    }
                }
                (Some(&&x), None) => {
                    out.push(x);
                    a.next();
                }
                (None, Some(&&y)) => {
                    out.push(y);
                    b.next();
                }
                (None, None) => break,
            }
        }
        DocIdSet { ids: out }
    }

    /// Intersection of two sets.
    pub fn intersection(&self, other: &DocIdSet) -> DocIdSet {
        let mut out = Vec::new();
        let (mut a, mut b) = (self.ids.iter().peekable(), other.ids.iter().peekable());
        while let (Some(&&x), Some(&&y)) = (a.peek(), b.peek()) {
            if x < y {
                a.next();
            } else if y < x {
                b.next();
            } else {
                out.push(x);
                a.next();
                b.next();
            }
        }
        DocIdSet { ids: out }
    }

    /// Members of `self` not in `other`.
    pub fn difference(&self, other: &DocIdSet) -> DocIdSet {
        let mut out = Vec::new();
        let (mut a, mut b) = (self.ids.iter().peekable(), other.ids.iter().peekable());
        loop {
            match (a.peek(), b.peek()) {
                (Some(&&x), Some(&&y)) => {
                    if x < y {
                        out.push(x);
                        a.next();
                    } else if y < x {
                        b.next();
                    } else {
                        a.next();
                        b.next();
                    }
                }
                (Some(&&x), None) => {
                    out.push(x);
                    a.next();
                }
                _ => break,
            }
        }
        DocIdSet { ids: out }
    }

    /// Whether the representation is sorted ascending without duplicates.
    pub fn is_sorted_unique(&self) -> bool {
        self.ids.windows(2).all(|w| w[0] < w[1])
    }
}

impl FromIterator<DocId> for DocIdSet {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        let mut ids: Vec<DocId> = iter.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        DocIdSet { ids }
    }
}
