//! Inverted index with bidirectional term and document maps
//!
//! `SearchIndex` keeps four maps consistent across every mutation:
//!
//! - `term_map`: term → (term id, docs containing it), ordered for
//!   prefix range scans
//! - `term_id_map`: term id → (term, docs), the mirror of `term_map`
//! - `doc_id_map`: doc id → (key, per-field term ids, feature values)
//! - `doc_key_map`: caller key → doc id, ordered
//!
//! The doc-id set of a term is materialized on both sides of the term
//! maps so either direction resolves in one lookup; both copies must
//! stay equal. Updates diff the old and new term sets of a document
//! and touch only the changed terms.

use docdex_core::{
    DocFeatVals, DocId, DocIdSet, DocTermIds, EngineError, EnumVec, Enumerable, Result, Term,
    TermId,
};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

/// Per-term entry: its id and the documents containing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermInfo {
    /// Dense id assigned on first occurrence.
    pub id: TermId,
    /// Documents with at least one occurrence of the term.
    pub docs: DocIdSet,
}

/// Mirror entry of [`TermInfo`], keyed by term id.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TermIdInfo {
    term: Term,
    docs: DocIdSet,
}

/// Per-document payload: caller key, term ids per field, feature values.
#[derive(Debug, Clone)]
pub struct DocInfo<K, F: Enumerable, P: Enumerable> {
    /// The caller-chosen document key.
    pub key: K,
    /// Per-field term-id sequences.
    pub terms: DocTermIds<F>,
    /// Per-feature values, stored verbatim.
    pub features: DocFeatVals<P>,
}

/// In-memory inverted index over documents with enumerated fields `F`
/// and features `P`, keyed by caller keys `K`.
///
/// Mutation is exclusive (`&mut self`); readers may share a snapshot
/// freely. Doc ids and term ids are allocated monotonically and never
/// reused within the index lifetime.
#[derive(Debug, Clone)]
pub struct SearchIndex<K, F: Enumerable, P: Enumerable> {
    term_map: BTreeMap<Term, TermInfo>,
    term_id_map: BTreeMap<TermId, TermIdInfo>,
    doc_id_map: BTreeMap<DocId, DocInfo<K, F, P>>,
    doc_key_map: BTreeMap<K, DocId>,
    next_term_id: TermId,
    next_doc_id: DocId,
}

impl<K: Ord, F: Enumerable, P: Enumerable> Default for SearchIndex<K, F, P> {
    fn default() -> Self {
        SearchIndex {
            term_map: BTreeMap::new(),
            term_id_map: BTreeMap::new(),
            doc_id_map: BTreeMap::new(),
            doc_key_map: BTreeMap::new(),
            next_term_id: TermId::new(0),
            next_doc_id: DocId::new(0),
        }
    }
}

impl<K: Ord + Clone, F: Enumerable, P: Enumerable> SearchIndex<K, F, P> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> usize {
        self.doc_id_map.len()
    }

    /// Number of distinct terms currently indexed.
    pub fn term_count(&self) -> usize {
        self.term_map.len()
    }

    /// Look up a term by its normalized string form.
    pub fn lookup_term(&self, term: &str) -> Option<(TermId, &DocIdSet)> {
        self.term_map.get(term).map(|info| (info.id, &info.docs))
    }

    /// All terms starting with `prefix`, in lexicographic order.
    ///
    /// An empty prefix yields nothing.
    pub fn lookup_terms_by_prefix(&self, prefix: &str) -> Vec<(&str, TermId, &DocIdSet)> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let lower = Bound::Included(prefix);
        let entries: Vec<_> = match prefix_upper_bound(prefix) {
            Some(upper) => self
                .term_map
                .range::<str, _>((lower, Bound::Excluded(upper.as_str())))
                .map(|(t, info)| (t.as_str(), info.id, &info.docs))
                .collect(),
            None => self
                .term_map
                .range::<str, _>((lower, Bound::Unbounded))
                .map(|(t, info)| (t.as_str(), info.id, &info.docs))
                .collect(),
        };
        entries
    }

    /// The doc-id set of a known term id.
    ///
    /// The id must come from this index; an unresolvable id means the
    /// maps went out of sync.
    pub fn lookup_term_id(&self, id: TermId) -> Result<&DocIdSet> {
        self.term_id_map
            .get(&id)
            .map(|info| &info.docs)
            .ok_or_else(|| EngineError::invariant(format!("term id {id} not in term id map")))
    }

    /// The payload of a known doc id.
    pub fn lookup_doc_id(&self, id: DocId) -> Result<&DocInfo<K, F, P>> {
        self.doc_id_map
            .get(&id)
            .ok_or_else(|| EngineError::invariant(format!("doc id {id} not in doc id map")))
    }

    /// The stored term ids of the document with the given key, if any.
    pub fn lookup_doc_key(&self, key: &K) -> Option<&DocTermIds<F>> {
        let id = self.doc_key_map.get(key)?;
        self.doc_id_map.get(id).map(|info| &info.terms)
    }

    /// The internal id of the document with the given key, if any.
    pub fn doc_id(&self, key: &K) -> Option<DocId> {
        self.doc_key_map.get(key).copied()
    }

    /// The string form of a known term id.
    pub fn term(&self, id: TermId) -> Result<&str> {
        self.term_id_map
            .get(&id)
            .map(|info| info.term.as_str())
            .ok_or_else(|| EngineError::invariant(format!("term id {id} not in term id map")))
    }

    /// The id of a term, if indexed.
    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.term_map.get(term).map(|info| info.id)
    }

    /// The caller key of a known doc id.
    pub fn doc_key(&self, id: DocId) -> Result<&K> {
        self.doc_id_map
            .get(&id)
            .map(|info| &info.key)
            .ok_or_else(|| EngineError::invariant(format!("doc id {id} not in doc id map")))
    }

    /// Iterate all documents in doc-id order.
    pub fn docs(&self) -> impl Iterator<Item = (DocId, &DocInfo<K, F, P>)> {
        self.doc_id_map.iter().map(|(&id, info)| (id, info))
    }

    /// Iterate all terms in lexicographic order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, TermId, &DocIdSet)> {
        self.term_map
            .iter()
            .map(|(t, info)| (t.as_str(), info.id, &info.docs))
    }

    /// Insert or update a document.
    ///
    /// Allocates a doc id for a new key, or reuses the existing id and
    /// diffs the old term set against the new one so unchanged terms
    /// are untouched. Terms are registered before the document's
    /// `DocTermIds` is built, since that structure stores term ids.
    pub fn insert_doc(
        &mut self,
        key: K,
        terms: EnumVec<F, Vec<Term>>,
        features: EnumVec<P, f32>,
    ) -> Result<DocId> {
        let existing = self.doc_key_map.get(&key).copied();
        let doc_id = match existing {
            Some(id) => id,
            None => {
                let id = self.next_doc_id;
                self.next_doc_id = id.succ();
                self.doc_key_map.insert(key.clone(), id);
                id
            }
        };

        let new_terms: BTreeSet<&str> = terms
            .iter()
            .flat_map(|(_, list)| list.iter().map(String::as_str))
            .collect();

        if existing.is_some() {
            let old_terms = self.stored_terms(doc_id)?;
            let removed: Vec<&str> = old_terms
                .iter()
                .filter(|t| !new_terms.contains(t.as_str()))
                .map(String::as_str)
                .collect();
            let added: Vec<&str> = new_terms
                .iter()
                .filter(|t| !old_terms.contains(**t))
                .copied()
                .collect();
            for t in removed {
                self.delete_term_entry(t, doc_id)?;
            }
            for t in added {
                self.insert_term_entry(t, doc_id)?;
            }
        } else {
            for &t in &new_terms {
                self.insert_term_entry(t, doc_id)?;
            }
        }

        let mut field_ids: EnumVec<F, Vec<TermId>> = EnumVec::from_fn(|_| Vec::new());
        for f in F::all() {
            let mut ids = Vec::with_capacity(terms[f].len());
            for t in &terms[f] {
                let info = self.term_map.get(t).ok_or_else(|| {
                    EngineError::invariant(format!("term {t:?} absent right after registration"))
                })?;
                ids.push(info.id);
            }
            field_ids[f] = ids;
        }

        self.doc_id_map.insert(
            doc_id,
            DocInfo {
                key,
                terms: DocTermIds::new(field_ids),
                features: DocFeatVals::new(features),
            },
        );

        #[cfg(debug_assertions)]
        self.check_invariant()?;
        Ok(doc_id)
    }

    /// Delete a document by key.
    ///
    /// Returns the freed doc id, or `None` if the key was not indexed.
    /// The id itself is not recycled.
    pub fn delete_doc(&mut self, key: &K) -> Result<Option<DocId>> {
        let Some(&doc_id) = self.doc_key_map.get(key) else {
            return Ok(None);
        };
        let old_terms = self.stored_terms(doc_id)?;
        for t in &old_terms {
            self.delete_term_entry(t, doc_id)?;
        }
        self.doc_id_map.remove(&doc_id);
        self.doc_key_map.remove(key);

        #[cfg(debug_assertions)]
        self.check_invariant()?;
        Ok(Some(doc_id))
    }

    /// The distinct terms stored for a document, resolved back to
    /// their string forms.
    fn stored_terms(&self, doc_id: DocId) -> Result<BTreeSet<Term>> {
        let info = self.lookup_doc_id(doc_id)?;
        let mut out = BTreeSet::new();
        for id in info.terms.iter_all() {
            let entry = self.term_id_map.get(&id).ok_or_else(|| {
                EngineError::invariant(format!("stored term id {id} not in term id map"))
            })?;
            if !out.contains(&entry.term) {
                out.insert(entry.term.clone());
            }
        }
        Ok(out)
    }

    /// Record that document `d` contains `term`, allocating a term id
    /// on first occurrence. Both term maps are updated.
    fn insert_term_entry(&mut self, term: &str, d: DocId) -> Result<()> {
        if let Some(info) = self.term_map.get_mut(term) {
            info.docs.insert(d);
            let id = info.id;
            let docs = info.docs.clone();
            let mirror = self.term_id_map.get_mut(&id).ok_or_else(|| {
                EngineError::invariant(format!("term id {id} missing its mirror entry"))
            })?;
            mirror.docs = docs;
        } else {
            let id = self.next_term_id;
            self.next_term_id = id.succ();
            let docs = DocIdSet::singleton(d);
            self.term_map.insert(
                term.to_owned(),
                TermInfo {
                    id,
                    docs: docs.clone(),
                },
            );
            self.term_id_map.insert(
                id,
                TermIdInfo {
                    term: term.to_owned(),
                    docs,
                },
            );
        }
        Ok(())
    }

    /// Record that document `d` no longer contains `term`. Removes the
    /// term entirely once its doc set drains. Unknown terms are a no-op.
    fn delete_term_entry(&mut self, term: &str, d: DocId) -> Result<()> {
        let (id, remaining) = match self.term_map.get_mut(term) {
            None => return Ok(()),
            Some(info) => {
                info.docs.remove(d);
                (info.id, info.docs.clone())
            }
        };
        if remaining.is_empty() {
            self.term_map.remove(term);
            if self.term_id_map.remove(&id).is_none() {
                return Err(EngineError::invariant(format!(
                    "term id {id} missing its mirror entry on removal"
                )));
            }
        } else {
            let mirror = self.term_id_map.get_mut(&id).ok_or_else(|| {
                EngineError::invariant(format!("term id {id} missing its mirror entry"))
            })?;
            mirror.docs = remaining;
        }
        Ok(())
    }

    /// Verify the cross-map consistency invariant.
    ///
    /// Checked after every mutation in debug builds; cheap enough for
    /// tests, linear in index size.
    pub fn check_invariant(&self) -> Result<()> {
        if self.term_map.len() != self.term_id_map.len() {
            return Err(EngineError::invariant(format!(
                "term map sizes differ: {} terms vs {} ids",
                self.term_map.len(),
                self.term_id_map.len()
            )));
        }
        for (term, info) in &self.term_map {
            let mirror = self.term_id_map.get(&info.id).ok_or_else(|| {
                EngineError::invariant(format!("term {term:?} id {} has no mirror", info.id))
            })?;
            if mirror.term != *term {
                return Err(EngineError::invariant(format!(
                    "term id {} maps back to {:?}, expected {term:?}",
                    info.id, mirror.term
                )));
            }
            if mirror.docs != info.docs {
                return Err(EngineError::invariant(format!(
                    "doc sets for term {term:?} diverge between maps"
                )));
            }
            if !info.docs.is_sorted_unique() {
                return Err(EngineError::invariant(format!(
                    "doc set for term {term:?} is not sorted-unique"
                )));
            }
            if info.docs.is_empty() {
                return Err(EngineError::invariant(format!(
                    "term {term:?} has an empty doc set"
                )));
            }
            if info.id >= self.next_term_id {
                return Err(EngineError::invariant(format!(
                    "term id {} not below counter {}",
                    info.id, self.next_term_id
                )));
            }
            for d in info.docs.iter() {
                if d >= self.next_doc_id {
                    return Err(EngineError::invariant(format!(
                        "doc id {d} in term {term:?} not below counter {}",
                        self.next_doc_id
                    )));
                }
                let doc = self.doc_id_map.get(&d).ok_or_else(|| {
                    EngineError::invariant(format!("doc id {d} in term {term:?} has no payload"))
                })?;
                let occurs = F::all().any(|f| doc.terms.field_term_count(f, info.id) > 0);
                if !occurs {
                    return Err(EngineError::invariant(format!(
                        "doc id {d} listed for term {term:?} without any occurrence"
                    )));
                }
            }
        }

        if self.doc_key_map.len() != self.doc_id_map.len() {
            return Err(EngineError::invariant(format!(
                "doc map sizes differ: {} keys vs {} ids",
                self.doc_key_map.len(),
                self.doc_id_map.len()
            )));
        }
        for (key, &d) in &self.doc_key_map {
            let info = self.doc_id_map.get(&d).ok_or_else(|| {
                EngineError::invariant(format!("doc id {d} from key map has no payload"))
            })?;
            if info.key != *key {
                return Err(EngineError::invariant(format!(
                    "doc id {d} stores a different key than the key map"
                )));
            }
        }
        for (&d, info) in &self.doc_id_map {
            if d >= self.next_doc_id {
                return Err(EngineError::invariant(format!(
                    "doc id {d} not below counter {}",
                    self.next_doc_id
                )));
            }
            for id in info.terms.iter_all() {
                if !self.term_id_map.contains_key(&id) {
                    return Err(EngineError::invariant(format!(
                        "doc id {d} stores unresolvable term id {id}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// The exclusive upper bound of the key range starting with `prefix`.
///
/// Trailing `char::MAX` characters cannot be incremented and are
/// stripped; the last remaining character is bumped to its successor
/// codepoint (skipping the surrogate gap). `None` means the range is
/// unbounded above.
fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while chars.last() == Some(&char::MAX) {
        chars.pop();
    }
    let last = chars.pop()?;
    let succ = char::from_u32(last as u32 + 1).unwrap_or('\u{E000}');
    chars.push(succ);
    Some(chars.into_iter().collect())
}
