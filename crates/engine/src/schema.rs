//! Engine configuration
//!
//! A schema fixes the field and feature alphabets and their ranking
//! parameters at construction time. Fields cannot be added to a live
//! engine.

use crate::markup::InlineCodePolicy;
use crate::rank::{FeatureFunction, RankParams};
use crate::tokenizer;
use docdex_core::{EnumVec, Enumerable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a field's raw string becomes index terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldAnalyzer {
    /// Plain text, extracted directly.
    Plain,
    /// Documentation markup, parsed by the installed parser and folded.
    /// Without a parser, or when parsing fails, the field yields no terms.
    Documentation,
}

/// Ranking and extraction configuration for one field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    /// Weight of this field's term frequencies.
    pub weight: f32,
    /// Length-normalization parameter for this field.
    pub b: f32,
    /// How raw content is turned into terms.
    pub analyzer: FieldAnalyzer,
}

/// Ranking configuration for one non-term feature.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    /// Weight of the shaped feature value.
    pub weight: f32,
    /// Shaping function applied to the raw value.
    pub function: FeatureFunction,
}

/// Full engine configuration, fixed at construction.
#[derive(Debug, Clone)]
pub struct Schema<F: Enumerable, P: Enumerable> {
    /// Term-frequency saturation parameter.
    pub k1: f32,
    /// Per-field configuration.
    pub fields: EnumVec<F, FieldSchema>,
    /// Per-feature configuration.
    pub features: EnumVec<P, FeatureSchema>,
    /// Stopword set, already case-folded.
    pub stop_words: HashSet<String>,
    /// Inline-code extraction policy for documentation fields.
    pub inline_code: InlineCodePolicy,
}

impl<F: Enumerable, P: Enumerable> Schema<F, P> {
    /// Build a schema with the default English stopwords and the
    /// default inline-code policy.
    pub fn new(k1: f32, fields: EnumVec<F, FieldSchema>, features: EnumVec<P, FeatureSchema>) -> Self {
        Schema {
            k1,
            fields,
            features,
            stop_words: tokenizer::english_stop_words(),
            inline_code: InlineCodePolicy::default(),
        }
    }

    /// Replace the stopword set.
    pub fn with_stop_words(mut self, stop_words: HashSet<String>) -> Self {
        self.stop_words = stop_words;
        self
    }

    /// Replace the inline-code policy.
    pub fn with_inline_code_policy(mut self, policy: InlineCodePolicy) -> Self {
        self.inline_code = policy;
        self
    }

    /// The ranker parameters this schema implies.
    pub(crate) fn rank_params(&self) -> RankParams<F, P> {
        RankParams {
            k1: self.k1,
            field_b: self.fields.map(|_, fs| fs.b),
            field_weight: self.fields.map(|_, fs| fs.weight),
            feature_weight: self.features.map(|_, ps| ps.weight),
            feature_function: self.features.map(|_, ps| ps.function),
        }
    }
}
