//! Search engine facade
//!
//! `SearchEngine` assembles the inverted index, the BM25F ranker and
//! the text extractor behind one surface: `insert_doc`, `delete_doc`,
//! `query`, `query_explain` and a few read-side helpers. The ranker
//! context is rebuilt from live corpus statistics on every query, so
//! scores always reflect the current index.

use crate::index::{DocInfo, SearchIndex};
use crate::markup::Markup;
use crate::rank::{self, Corpus, Explanation, RankParams, RankedDoc};
use crate::schema::{FieldAnalyzer, Schema};
use crate::tokenizer;
use docdex_core::{
    DocFeatVals, DocId, DocIdSet, DocTermIds, EnumVec, Enumerable, Result, Term, TermId,
};
use std::collections::HashMap;
use std::fmt;

/// Parser turning a raw documentation string into a markup tree.
///
/// Supplied by the caller; the engine defines the tree but not the
/// grammar. `None` means the text did not parse.
pub type MarkupParser = Box<dyn Fn(&str) -> Option<Markup> + Send + Sync>;

/// In-memory full-text search engine over documents keyed by `K`,
/// with field alphabet `F` and feature alphabet `P`.
///
/// Writers must hold the engine exclusively; readers may share an
/// immutable snapshot.
pub struct SearchEngine<K, F: Enumerable, P: Enumerable> {
    schema: Schema<F, P>,
    params: RankParams<F, P>,
    index: SearchIndex<K, F, P>,
    field_len_totals: EnumVec<F, u64>,
    markup_parser: Option<MarkupParser>,
}

impl<K: Ord + Clone, F: Enumerable, P: Enumerable> fmt::Debug for SearchEngine<K, F, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchEngine")
            .field("docs", &self.index.doc_count())
            .field("terms", &self.index.term_count())
            .field("has_markup_parser", &self.markup_parser.is_some())
            .finish_non_exhaustive()
    }
}

impl<K: Ord + Clone, F: Enumerable, P: Enumerable> SearchEngine<K, F, P> {
    /// Create an empty engine for the given schema.
    pub fn new(schema: Schema<F, P>) -> Self {
        let params = schema.rank_params();
        SearchEngine {
            schema,
            params,
            index: SearchIndex::new(),
            field_len_totals: EnumVec::filled(0),
            markup_parser: None,
        }
    }

    /// Install the documentation-markup parser used for
    /// [`FieldAnalyzer::Documentation`] fields.
    pub fn with_markup_parser(
        mut self,
        parser: impl Fn(&str) -> Option<Markup> + Send + Sync + 'static,
    ) -> Self {
        self.markup_parser = Some(Box::new(parser));
        self
    }

    /// Number of indexed documents.
    pub fn doc_count(&self) -> usize {
        self.index.doc_count()
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.index.term_count()
    }

    /// Mean length of `field` over all documents; zero on an empty
    /// corpus or a field that is empty everywhere.
    pub fn avg_field_len(&self, field: F) -> f32 {
        let docs = self.index.doc_count();
        if docs == 0 {
            return 0.0;
        }
        self.field_len_totals[field] as f32 / docs as f32
    }

    /// Read-only view of the underlying index.
    pub fn index(&self) -> &SearchIndex<K, F, P> {
        &self.index
    }

    /// Verify index consistency. Linear in index size.
    pub fn check_invariant(&self) -> Result<()> {
        self.index.check_invariant()
    }

    /// Insert or update a document from per-field raw strings and
    /// per-feature values.
    pub fn insert_doc(
        &mut self,
        key: K,
        fields: EnumVec<F, String>,
        features: EnumVec<P, f32>,
    ) -> Result<DocId> {
        let extracted: EnumVec<F, Vec<Term>> =
            EnumVec::from_fn(|f| self.extract(f, &fields[f]));

        if let Some(old) = self.index.lookup_doc_key(&key) {
            let old_lens: EnumVec<F, u64> = EnumVec::from_fn(|f| old.field_len(f) as u64);
            for (f, len) in old_lens.iter() {
                self.field_len_totals[f] -= len;
            }
        }
        for (f, list) in extracted.iter() {
            self.field_len_totals[f] += list.len() as u64;
        }

        let doc_id = self.index.insert_doc(key, extracted, features)?;
        tracing::debug!(
            target: "docdex::engine",
            doc = %doc_id,
            docs = self.index.doc_count(),
            terms = self.index.term_count(),
            "document indexed"
        );
        Ok(doc_id)
    }

    /// Delete a document by key. Returns whether it was indexed.
    pub fn delete_doc(&mut self, key: &K) -> Result<bool> {
        let Some(old) = self.index.lookup_doc_key(key) else {
            return Ok(false);
        };
        let old_lens: EnumVec<F, u64> = EnumVec::from_fn(|f| old.field_len(f) as u64);
        for (f, len) in old_lens.iter() {
            self.field_len_totals[f] -= len;
        }
        let removed = self.index.delete_doc(key)?;
        tracing::debug!(
            target: "docdex::engine",
            docs = self.index.doc_count(),
            terms = self.index.term_count(),
            "document deleted"
        );
        Ok(removed.is_some())
    }

    /// The normalized, deduplicated terms a query string produces.
    pub fn query_terms(&self, query: &str) -> Vec<Term> {
        tokenizer::unique_terms(tokenizer::synopsis_terms(&self.schema.stop_words, query))
    }

    /// Top-`k` documents for a query, ordered by descending score with
    /// ties broken by ascending key.
    ///
    /// A query that extracts no terms, or matches nothing, yields an
    /// empty result.
    pub fn query(&self, query: &str, top_k: usize) -> Result<Vec<(K, f32)>> {
        let terms = self.query_terms(query);
        if terms.is_empty() || top_k == 0 || self.index.doc_count() == 0 {
            return Ok(Vec::new());
        }
        let (candidates, resolved) = self.candidates(&terms);
        let corpus = self.corpus_view();

        let mut hits: Vec<(K, f32)> = Vec::with_capacity(candidates.len());
        for d in candidates.iter() {
            let info = self.index.lookup_doc_id(d)?;
            let doc = IndexedDoc {
                terms: &info.terms,
                features: &info.features,
                resolved: &resolved,
            };
            let score = rank::score(&self.params, &corpus, &doc, &terms);
            hits.push((info.key.clone(), score));
        }
        tracing::trace!(
            target: "docdex::engine",
            terms = terms.len(),
            candidates = hits.len(),
            "query scored"
        );

        let ranked = |a: &(K, f32), b: &(K, f32)| {
            b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
        };
        if hits.len() > top_k {
            hits.select_nth_unstable_by(top_k - 1, ranked);
            hits.truncate(top_k);
        }
        hits.sort_unstable_by(ranked);
        Ok(hits)
    }

    /// Every matching document with its full score breakdown, ordered
    /// like [`SearchEngine::query`].
    pub fn query_explain(&self, query: &str) -> Result<Vec<(K, Explanation<F, P>)>> {
        let terms = self.query_terms(query);
        if terms.is_empty() || self.index.doc_count() == 0 {
            return Ok(Vec::new());
        }
        let (candidates, resolved) = self.candidates(&terms);
        let corpus = self.corpus_view();

        let mut hits: Vec<(K, Explanation<F, P>)> = Vec::with_capacity(candidates.len());
        for d in candidates.iter() {
            let info = self.index.lookup_doc_id(d)?;
            let doc = IndexedDoc {
                terms: &info.terms,
                features: &info.features,
                resolved: &resolved,
            };
            let explanation = rank::explain(&self.params, &corpus, &doc, &terms);
            hits.push((info.key.clone(), explanation));
        }
        hits.sort_unstable_by(|a, b| {
            b.1.score.total_cmp(&a.1.score).then_with(|| a.0.cmp(&b.0))
        });
        Ok(hits)
    }

    /// Up to `limit` indexed terms starting with `prefix`, in
    /// lexicographic order. Empty prefixes yield nothing.
    pub fn suggest(&self, prefix: &str, limit: usize) -> Vec<Term> {
        self.index
            .lookup_terms_by_prefix(prefix)
            .into_iter()
            .take(limit)
            .map(|(t, _, _)| t.to_string())
            .collect()
    }

    /// The stored payload of a document, if indexed.
    pub fn lookup_doc(&self, key: &K) -> Option<&DocInfo<K, F, P>> {
        let id = self.index.doc_id(key)?;
        self.index.lookup_doc_id(id).ok()
    }

    /// Extract terms for one field according to its analyzer.
    fn extract(&self, field: F, raw: &str) -> Vec<Term> {
        match self.schema.fields[field].analyzer {
            FieldAnalyzer::Plain => tokenizer::synopsis_terms(&self.schema.stop_words, raw),
            FieldAnalyzer::Documentation => {
                match self.markup_parser.as_ref().and_then(|parse| parse(raw)) {
                    Some(tree) => tokenizer::description_terms(
                        &self.schema.stop_words,
                        &tree,
                        self.schema.inline_code,
                    ),
                    None => Vec::new(),
                }
            }
        }
    }

    /// Union of the doc sets of every known query term, plus the
    /// term-id resolution the per-document view needs.
    fn candidates(&self, terms: &[Term]) -> (DocIdSet, HashMap<Term, TermId>) {
        let mut docs = DocIdSet::new();
        let mut resolved = HashMap::with_capacity(terms.len());
        for t in terms {
            if let Some((id, set)) = self.index.lookup_term(t) {
                docs = docs.union(set);
                resolved.insert(t.clone(), id);
            }
        }
        (docs, resolved)
    }

    fn corpus_view(&self) -> EngineCorpus<'_, K, F, P> {
        EngineCorpus {
            index: &self.index,
            avg_len: EnumVec::from_fn(|f| self.avg_field_len(f)),
        }
    }
}

/// Live corpus statistics the ranker reads during one query.
struct EngineCorpus<'a, K, F: Enumerable, P: Enumerable> {
    index: &'a SearchIndex<K, F, P>,
    avg_len: EnumVec<F, f32>,
}

impl<K: Ord + Clone, F: Enumerable, P: Enumerable> Corpus<F> for EngineCorpus<'_, K, F, P> {
    fn doc_count(&self) -> f32 {
        self.index.doc_count() as f32
    }

    fn avg_field_len(&self, field: F) -> f32 {
        self.avg_len[field]
    }

    fn docs_with_term(&self, term: &str) -> f32 {
        self.index
            .lookup_term(term)
            .map(|(_, docs)| docs.len())
            .unwrap_or(0) as f32
    }
}

/// Ranker view over one stored document.
struct IndexedDoc<'a, F: Enumerable, P: Enumerable> {
    terms: &'a DocTermIds<F>,
    features: &'a DocFeatVals<P>,
    resolved: &'a HashMap<Term, TermId>,
}

impl<F: Enumerable, P: Enumerable> RankedDoc<F, P> for IndexedDoc<'_, F, P> {
    fn field_len(&self, field: F) -> f32 {
        self.terms.field_len(field) as f32
    }

    fn field_term_frequency(&self, field: F, term: &str) -> f32 {
        match self.resolved.get(term) {
            Some(&id) => self.terms.field_term_count(field, id) as f32,
            None => 0.0,
        }
    }

    fn feature_value(&self, feature: P) -> f32 {
        self.features.get(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::FeatureFunction;
    use crate::schema::{FeatureSchema, FieldSchema};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Field {
        Synopsis,
        Description,
    }
    docdex_core::enumerable!(Field { Synopsis, Description });

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Feature {
        Downloads,
    }
    docdex_core::enumerable!(Feature { Downloads });

    type Engine = SearchEngine<String, Field, Feature>;

    fn schema() -> Schema<Field, Feature> {
        Schema::new(
            1.2,
            EnumVec::from_fn(|f| FieldSchema {
                weight: match f {
                    Field::Synopsis => 2.0,
                    Field::Description => 1.0,
                },
                b: 0.75,
                analyzer: FieldAnalyzer::Plain,
            }),
            EnumVec::from_fn(|_| FeatureSchema {
                weight: 0.0,
                function: FeatureFunction::Rational { shift: 1.0 },
            }),
        )
    }

    fn content(synopsis: &str, description: &str) -> EnumVec<Field, String> {
        EnumVec::from_fn(|f| {
            match f {
                Field::Synopsis => synopsis,
                Field::Description => description,
            }
            .to_string()
        })
    }

    fn insert(engine: &mut Engine, key: &str, synopsis: &str, description: &str) {
        engine
            .insert_doc(key.to_string(), content(synopsis, description), EnumVec::filled(0.0))
            .unwrap();
    }

    #[test]
    fn test_query_ranks_matching_docs() {
        let mut engine = Engine::new(schema());
        insert(&mut engine, "pkg-a", "fast parser", "a parser for things");
        insert(&mut engine, "pkg-b", "slow printer", "prints things nicely");

        let hits = engine.query("parser", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "pkg-a");
        assert!(hits[0].1 > 0.0);
    }

    #[test]
    fn test_query_respects_top_k() {
        let mut engine = Engine::new(schema());
        for i in 0..10 {
            insert(&mut engine, &format!("pkg-{i}"), "shared", "");
        }
        assert_eq!(engine.query("shared", 3).unwrap().len(), 3);
        assert_eq!(engine.query("shared", 0).unwrap().len(), 0);
    }

    #[test]
    fn test_tied_scores_order_by_key() {
        let mut engine = Engine::new(schema());
        insert(&mut engine, "zzz", "identical text", "");
        insert(&mut engine, "aaa", "identical text", "");

        let hits = engine.query("identical", 10).unwrap();
        assert_eq!(hits[0].0, "aaa");
        assert_eq!(hits[1].0, "zzz");
        assert_eq!(hits[0].1, hits[1].1);
    }

    #[test]
    fn test_repeated_query_word_counts_once() {
        let mut engine = Engine::new(schema());
        insert(&mut engine, "pkg-a", "wombat", "");
        let once = engine.query("wombat", 10).unwrap();
        let twice = engine.query("wombat wombat", 10).unwrap();
        assert_eq!(once[0].1, twice[0].1);
    }

    #[test]
    fn test_update_changes_results() {
        let mut engine = Engine::new(schema());
        insert(&mut engine, "pkg-a", "alpha beta", "");
        insert(&mut engine, "pkg-a", "alpha gamma", "");

        assert!(engine.query("beta", 10).unwrap().is_empty());
        assert_eq!(engine.query("gamma", 10).unwrap().len(), 1);
        assert_eq!(engine.doc_count(), 1);
    }

    #[test]
    fn test_delete_doc() {
        let mut engine = Engine::new(schema());
        insert(&mut engine, "pkg-a", "alpha", "");
        assert!(engine.delete_doc(&"pkg-a".to_string()).unwrap());
        assert!(!engine.delete_doc(&"pkg-a".to_string()).unwrap());
        assert_eq!(engine.doc_count(), 0);
        assert!(engine.query("alpha", 10).unwrap().is_empty());
    }

    #[test]
    fn test_avg_field_len_tracks_updates() {
        let mut engine = Engine::new(schema());
        insert(&mut engine, "a", "one two three four", "");
        insert(&mut engine, "b", "one two", "");
        assert!((engine.avg_field_len(Field::Synopsis) - 3.0).abs() < 1e-6);

        insert(&mut engine, "a", "one two", "");
        assert!((engine.avg_field_len(Field::Synopsis) - 2.0).abs() < 1e-6);

        engine.delete_doc(&"a".to_string()).unwrap();
        assert!((engine.avg_field_len(Field::Synopsis) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_documentation_field_without_parser_yields_no_terms() {
        let mut engine = Engine::new(Schema::new(
            1.2,
            EnumVec::from_fn(|f| FieldSchema {
                weight: 1.0,
                b: 0.75,
                analyzer: match f {
                    Field::Synopsis => FieldAnalyzer::Plain,
                    Field::Description => FieldAnalyzer::Documentation,
                },
            }),
            EnumVec::from_fn(|_| FeatureSchema {
                weight: 0.0,
                function: FeatureFunction::Rational { shift: 1.0 },
            }),
        ));
        insert(&mut engine, "pkg-a", "synopsis words", "description words");
        assert!(engine.query("description", 10).unwrap().is_empty());
        assert_eq!(engine.query("synopsis", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_documentation_field_with_parser() {
        let engine = SearchEngine::new(Schema::new(
            1.2,
            EnumVec::from_fn(|f| FieldSchema {
                weight: 1.0,
                b: 0.75,
                analyzer: match f {
                    Field::Synopsis => FieldAnalyzer::Plain,
                    Field::Description => FieldAnalyzer::Documentation,
                },
            }),
            EnumVec::from_fn(|_| FeatureSchema {
                weight: 0.0,
                function: FeatureFunction::Rational { shift: 1.0 },
            }),
        ));
        // Toy parser: reject text containing "!!", wrap the rest in a
        // paragraph of plain prose.
        let mut engine = engine.with_markup_parser(|raw: &str| {
            if raw.contains("!!") {
                None
            } else {
                Some(Markup::Paragraph(Box::new(Markup::Text(raw.to_string()))))
            }
        });

        insert(&mut engine, "good", "", "streaming parser combinators");
        insert(&mut engine, "bad", "", "does not parse !!");

        assert_eq!(engine.query("streaming", 10).unwrap().len(), 1);
        // The unparseable description contributed nothing.
        assert!(engine.query("parse", 10).unwrap().iter().all(|(k, _)| k != "bad"));
    }

    #[test]
    fn test_suggest() {
        let mut engine = Engine::new(schema());
        insert(&mut engine, "pkg-a", "car card care dog", "");
        assert_eq!(engine.suggest("car", 10), vec!["car", "card", "care"]);
        assert_eq!(engine.suggest("car", 2).len(), 2);
        assert!(engine.suggest("", 10).is_empty());
    }

    #[test]
    fn test_lookup_doc() {
        let mut engine = Engine::new(schema());
        insert(&mut engine, "pkg-a", "alpha beta", "");
        let info = engine.lookup_doc(&"pkg-a".to_string()).unwrap();
        assert_eq!(info.key, "pkg-a");
        assert_eq!(info.terms.field_len(Field::Synopsis), 2);
        assert!(engine.lookup_doc(&"missing".to_string()).is_none());
    }

    #[test]
    fn test_feature_scores_affect_ranking() {
        let mut engine = SearchEngine::new(Schema::new(
            1.2,
            EnumVec::from_fn(|_| FieldSchema {
                weight: 1.0,
                b: 0.75,
                analyzer: FieldAnalyzer::Plain,
            }),
            EnumVec::from_fn(|_: Feature| FeatureSchema {
                weight: 5.0,
                function: FeatureFunction::Rational { shift: 1.0 },
            }),
        ));
        engine
            .insert_doc("popular".to_string(), content("widget", ""), EnumVec::filled(1000.0))
            .unwrap();
        engine
            .insert_doc("obscure".to_string(), content("widget", ""), EnumVec::filled(0.0))
            .unwrap();

        let hits = engine.query("widget", 10).unwrap();
        assert_eq!(hits[0].0, "popular");
    }

    #[test]
    fn test_explain_is_consistent_with_query() {
        let mut engine = Engine::new(schema());
        insert(&mut engine, "pkg-a", "quick brown fox", "jumps over dogs");
        insert(&mut engine, "pkg-b", "quick silver", "metallic");

        let hits = engine.query("quick fox", 10).unwrap();
        let explained = engine.query_explain("quick fox").unwrap();

        assert_eq!(hits.len(), explained.len());
        for ((key, score), (ekey, expl)) in hits.iter().zip(explained.iter()) {
            assert_eq!(key, ekey);
            assert_eq!(score.to_bits(), expl.score.to_bits());
            let parts: f32 = expl.term_scores.iter().map(|(_, s)| *s).sum::<f32>()
                + expl.feature_scores.iter().map(|(_, s)| *s).sum::<f32>();
            assert_eq!(parts.to_bits(), expl.score.to_bits());
        }
    }
}
