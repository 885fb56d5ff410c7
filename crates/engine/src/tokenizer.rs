//! Text extraction for indexing and queries
//!
//! Pipeline: whitespace tokens → drop punctuation-only tokens → split
//! on `)`, `-`, `/` (emitting the whole token plus its fragments when
//! it splits) → lowercase → remove stopwords → Snowball stem.
//!
//! Synopsis text enters the pipeline directly; documentation markup is
//! first folded to a token stream (see [`crate::markup`]). Queries run
//! through the same pipeline so query terms and index terms agree.

use crate::markup::{InlineCodePolicy, Markup};
use docdex_core::Term;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// Default English stopword list (the standard analyzer set).
const ENGLISH_STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Characters a token is additionally split on, beyond whitespace.
const SPLIT_CHARS: &[char] = &[')', '-', '/'];

/// The default English stopword set, already case-folded.
pub fn english_stop_words() -> HashSet<String> {
    ENGLISH_STOPWORDS.iter().map(|s| s.to_string()).collect()
}

/// Whether a token carries any word content at all.
fn is_word_like(token: &str) -> bool {
    token.chars().any(|c| c.is_alphanumeric())
}

/// Split `token` on [`SPLIT_CHARS`].
///
/// A token that splits into two or more pieces contributes the whole
/// token and every non-empty fragment; an unsplit token contributes
/// itself only.
fn expand_token<'t>(token: &'t str, out: &mut Vec<&'t str>) {
    let mut pieces = token.split(SPLIT_CHARS);
    let first = pieces.next();
    match pieces.next() {
        None => out.push(token),
        Some(second) => {
            out.push(token);
            out.extend(first.filter(|p| !p.is_empty()));
            if !second.is_empty() {
                out.push(second);
            }
            out.extend(pieces.filter(|p| !p.is_empty()));
        }
    }
}

/// Run raw word-like tokens through split, casefold, stopword removal
/// and stemming.
fn normalize<'t>(
    stop_words: &HashSet<String>,
    raw_tokens: impl Iterator<Item = &'t str>,
) -> Vec<Term> {
    let stemmer = Stemmer::create(Algorithm::English);
    let mut expanded = Vec::new();
    for token in raw_tokens.filter(|t| is_word_like(t)) {
        expand_token(token, &mut expanded);
    }
    expanded
        .into_iter()
        .filter_map(|token| {
            let folded = token.to_lowercase();
            if stop_words.contains(&folded) {
                return None;
            }
            Some(stemmer.stem(&folded).into_owned())
        })
        .collect()
}

/// Extract index terms from a plain synopsis string.
pub fn synopsis_terms(stop_words: &HashSet<String>, text: &str) -> Vec<Term> {
    normalize(stop_words, text.split_whitespace())
}

/// Extract index terms from a documentation markup tree.
pub fn description_terms(
    stop_words: &HashSet<String>,
    markup: &Markup,
    policy: InlineCodePolicy,
) -> Vec<Term> {
    normalize(stop_words, markup.raw_tokens(policy).into_iter())
}

/// Deduplicate terms, keeping first-occurrence order.
///
/// Used for queries, where a repeated word must not double-count.
pub fn unique_terms(terms: Vec<Term>) -> Vec<Term> {
    let mut seen = HashSet::new();
    terms.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<Term> {
        synopsis_terms(&english_stop_words(), text)
    }

    #[test]
    fn test_basic_extraction() {
        assert_eq!(terms("quick brown fox"), vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(terms("Quick BROWN"), vec!["quick", "brown"]);
    }

    #[test]
    fn test_stopwords_removed_after_folding() {
        assert_eq!(terms("The quick AND the dead"), vec!["quick", "dead"]);
    }

    #[test]
    fn test_stemming_applied() {
        assert_eq!(terms("running dogs"), vec!["run", "dog"]);
        assert_eq!(terms("parsers parsing"), terms("parser parse"));
    }

    #[test]
    fn test_punctuation_only_tokens_dropped() {
        assert_eq!(terms("foo -- bar ..."), vec!["foo", "bar"]);
        assert!(terms("... --- !!!").is_empty());
    }

    #[test]
    fn test_split_emits_whole_and_fragments() {
        // "input/output" splits in two: whole token plus both fragments.
        assert_eq!(terms("input/output"), vec!["input/output", "input", "output"]);
    }

    #[test]
    fn test_split_on_hyphen() {
        let out = terms("well-known");
        assert!(out.contains(&"well".to_string()));
        assert!(out.contains(&"known".to_string()));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_unsplit_token_emitted_once() {
        assert_eq!(terms("plain"), vec!["plain"]);
    }

    #[test]
    fn test_trailing_split_char_keeps_whole_token() {
        // "foo-" splits into "foo" and an empty piece: the whole token
        // still counts as split, the empty fragment is discarded.
        assert_eq!(terms("foo-"), vec!["foo-", "foo"]);
    }

    #[test]
    fn test_fragments_pass_stopword_filter() {
        // "the" resurfaces as a fragment and must still be dropped.
        let out = terms("state-of-the-art");
        assert!(out.contains(&"state-of-the-art".to_string()));
        assert!(out.contains(&"state".to_string()));
        assert!(out.contains(&"art".to_string()));
        assert!(!out.contains(&"the".to_string()));
    }

    #[test]
    fn test_empty_input() {
        assert!(terms("").is_empty());
        assert!(terms("   \t\n").is_empty());
    }

    #[test]
    fn test_custom_stopword_set() {
        let stop: HashSet<String> = ["dog".to_string()].into_iter().collect();
        assert_eq!(synopsis_terms(&stop, "the dog runs"), vec!["the", "run"]);
    }

    #[test]
    fn test_unique_terms_preserves_first_order() {
        let out = unique_terms(terms("dog cat dog bird cat"));
        assert_eq!(out, vec!["dog", "cat", "bird"]);
    }
}
