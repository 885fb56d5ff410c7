//! BM25F ranking
//!
//! Stateless scoring over a corpus-statistics view and a per-document
//! view. The term side combines per-field term frequencies through
//! per-field weights and length normalization before saturating; the
//! non-term side maps per-document feature values through a shaping
//! function. All arithmetic is `f32` and follows IEEE-754: a NaN
//! length norm marks a field with no content anywhere in the corpus
//! and is skipped, any other NaN is a parameter bug and is preserved
//! so callers see it.

use docdex_core::{EnumVec, Enumerable, Term};
use serde::{Deserialize, Serialize};

/// Corpus-level statistics the ranker reads.
pub trait Corpus<F> {
    /// Total number of documents.
    fn doc_count(&self) -> f32;
    /// Mean length of `field` over all documents.
    fn avg_field_len(&self, field: F) -> f32;
    /// Number of documents containing `term`.
    fn docs_with_term(&self, term: &str) -> f32;
}

/// Per-document view the ranker reads.
pub trait RankedDoc<F, P> {
    /// Length of `field` in term occurrences.
    fn field_len(&self, field: F) -> f32;
    /// Occurrences of `term` in `field`.
    fn field_term_frequency(&self, field: F, term: &str) -> f32;
    /// Value of the non-term feature.
    fn feature_value(&self, feature: P) -> f32;
}

/// Shaping function applied to a raw feature value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FeatureFunction {
    /// `x ↦ ln(shift + x)`
    Logarithmic {
        /// Additive shift inside the logarithm.
        shift: f32,
    },
    /// `x ↦ x / (shift + x)`
    Rational {
        /// Additive shift in the denominator.
        shift: f32,
    },
    /// `x ↦ 1 / (offset + e^(−x · steepness))`
    Sigmoid {
        /// Additive offset in the denominator.
        offset: f32,
        /// Slope of the exponential.
        steepness: f32,
    },
}

impl FeatureFunction {
    /// Apply the function to a raw feature value.
    pub fn apply(self, x: f32) -> f32 {
        match self {
            FeatureFunction::Logarithmic { shift } => (shift + x).ln(),
            FeatureFunction::Rational { shift } => x / (shift + x),
            FeatureFunction::Sigmoid { offset, steepness } => {
                1.0 / (offset + (-x * steepness).exp())
            }
        }
    }
}

/// BM25F parameters over field alphabet `F` and feature alphabet `P`.
#[derive(Debug, Clone)]
pub struct RankParams<F: Enumerable, P: Enumerable> {
    /// Term-frequency saturation parameter.
    pub k1: f32,
    /// Per-field length-normalization parameter.
    pub field_b: EnumVec<F, f32>,
    /// Per-field weight on term frequency.
    pub field_weight: EnumVec<F, f32>,
    /// Per-feature weight on the shaped value.
    pub feature_weight: EnumVec<P, f32>,
    /// Per-feature shaping function.
    pub feature_function: EnumVec<P, FeatureFunction>,
}

/// Per-query-term and per-feature breakdown of a document score.
///
/// `term_scores` and `feature_scores` partition the overall score. The
/// per-(term, field) entries are diagnostic only: the multi-field
/// combination is non-linear, so they do not sum to the term score.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation<F, P> {
    /// The full document score, equal to the sum of `term_scores` and
    /// `feature_scores`.
    pub score: f32,
    /// Contribution of each query term.
    pub term_scores: Vec<(Term, f32)>,
    /// Contribution of each non-term feature.
    pub feature_scores: Vec<(P, f32)>,
    /// Score of each query term as if only one field carried weight.
    pub term_field_scores: Vec<(Term, F, f32)>,
}

/// Inverse document frequency: `ln(1 + (N − n + 0.5) / (n + 0.5))`.
///
/// The `+1` smoothing keeps the weight positive even for terms that
/// appear in most of the corpus, so a matching document never scores
/// below a non-matching one.
pub fn idf(doc_count: f32, docs_with_term: f32) -> f32 {
    ((doc_count - docs_with_term + 0.5) / (docs_with_term + 0.5) + 1.0).ln()
}

/// Per-field length normalization `(1 − b) + b · len / avg`.
///
/// NaN (an empty field in a corpus where the field is always empty)
/// is the skip marker for [`weighted_tf`].
fn length_norm(b: f32, field_len: f32, avg_field_len: f32) -> f32 {
    (1.0 - b) + b * field_len / avg_field_len
}

/// Field-weighted, length-normalized term frequency.
///
/// With `restrict` set, every other field contributes with weight
/// zero; used for the diagnostic per-field scores.
fn weighted_tf<F, P, C, D>(
    params: &RankParams<F, P>,
    corpus: &C,
    doc: &D,
    term: &str,
    restrict: Option<F>,
) -> f32
where
    F: Enumerable,
    P: Enumerable,
    C: Corpus<F>,
    D: RankedDoc<F, P>,
{
    let mut tf = 0.0;
    for f in F::all() {
        let norm = length_norm(params.field_b[f], doc.field_len(f), corpus.avg_field_len(f));
        if norm.is_nan() {
            continue;
        }
        let weight = match restrict {
            Some(only) if only != f => 0.0,
            _ => params.field_weight[f],
        };
        tf += weight * doc.field_term_frequency(f, term) / norm;
    }
    tf
}

fn term_score<F, P, C, D>(
    params: &RankParams<F, P>,
    corpus: &C,
    doc: &D,
    term: &str,
    restrict: Option<F>,
) -> f32
where
    F: Enumerable,
    P: Enumerable,
    C: Corpus<F>,
    D: RankedDoc<F, P>,
{
    let tf = weighted_tf(params, corpus, doc, term, restrict);
    idf(corpus.doc_count(), corpus.docs_with_term(term)) * tf / (params.k1 + tf)
}

fn feature_score<F, P, D>(params: &RankParams<F, P>, doc: &D, feature: P) -> f32
where
    F: Enumerable,
    P: Enumerable,
    D: RankedDoc<F, P>,
{
    params.feature_weight[feature] * params.feature_function[feature].apply(doc.feature_value(feature))
}

/// BM25F score of one document against the query terms.
pub fn score<F, P, C, D>(params: &RankParams<F, P>, corpus: &C, doc: &D, terms: &[Term]) -> f32
where
    F: Enumerable,
    P: Enumerable,
    C: Corpus<F>,
    D: RankedDoc<F, P>,
{
    let term_part: f32 = terms
        .iter()
        .map(|t| term_score(params, corpus, doc, t, None))
        .sum();
    let feature_part: f32 = P::all().map(|p| feature_score(params, doc, p)).sum();
    term_part + feature_part
}

/// Score with a full per-term and per-feature breakdown.
///
/// `score` here is bit-identical to [`score`]: the same per-term and
/// per-feature values are produced in the same order and summed the
/// same way.
pub fn explain<F, P, C, D>(
    params: &RankParams<F, P>,
    corpus: &C,
    doc: &D,
    terms: &[Term],
) -> Explanation<F, P>
where
    F: Enumerable,
    P: Enumerable,
    C: Corpus<F>,
    D: RankedDoc<F, P>,
{
    let term_scores: Vec<(Term, f32)> = terms
        .iter()
        .map(|t| (t.clone(), term_score(params, corpus, doc, t, None)))
        .collect();
    let feature_scores: Vec<(P, f32)> = P::all()
        .map(|p| (p, feature_score(params, doc, p)))
        .collect();
    let term_field_scores: Vec<(Term, F, f32)> = terms
        .iter()
        .flat_map(|t| {
            F::all().map(move |f| (t.clone(), f, term_score(params, corpus, doc, t, Some(f))))
        })
        .collect();

    let term_part: f32 = term_scores.iter().map(|(_, s)| *s).sum();
    let feature_part: f32 = feature_scores.iter().map(|(_, s)| *s).sum();

    Explanation {
        score: term_part + feature_part,
        term_scores,
        feature_scores,
        term_field_scores,
    }
}

/// Scorer for many terms against one document.
///
/// Hoists `k1`, the corpus size and the per-field `weight / norm`
/// factors out of the per-term loop. Equivalent to [`score`]'s term
/// side up to floating-point rearrangement.
#[derive(Debug)]
pub struct BulkScorer<'c, F: Enumerable, C> {
    k1: f32,
    doc_count: f32,
    corpus: &'c C,
    field_factor: EnumVec<F, f32>,
}

impl<'c, F: Enumerable, C: Corpus<F>> BulkScorer<'c, F, C> {
    /// Precompute per-field factors for one document.
    pub fn new<P, D>(params: &RankParams<F, P>, corpus: &'c C, doc: &D) -> Self
    where
        P: Enumerable,
        D: RankedDoc<F, P>,
    {
        let field_factor = EnumVec::from_fn(|f| {
            let norm = length_norm(params.field_b[f], doc.field_len(f), corpus.avg_field_len(f));
            if norm.is_nan() {
                0.0
            } else {
                params.field_weight[f] / norm
            }
        });
        BulkScorer {
            k1: params.k1,
            doc_count: corpus.doc_count(),
            corpus,
            field_factor,
        }
    }

    /// Score one term given its per-field frequencies in the document.
    pub fn score_term(&self, term: &str, tf_by_field: &EnumVec<F, f32>) -> f32 {
        let mut tf = 0.0;
        for f in F::all() {
            tf += self.field_factor[f] * tf_by_field[f];
        }
        idf(self.doc_count, self.corpus.docs_with_term(term)) * tf / (self.k1 + tf)
    }
}
