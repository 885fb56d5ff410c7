//! Documentation markup trees
//!
//! The markup AST is produced by an external documentation-comment
//! parser and consumed here as input. Folding a tree yields the raw
//! token stream that feeds the extraction pipeline; structural nodes
//! that carry no prose (modules, code blocks, pictures, anchors) are
//! discarded.

use serde::{Deserialize, Serialize};

/// A documentation markup tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Markup {
    /// Nothing.
    Empty,
    /// Plain prose.
    Text(String),
    /// A paragraph around its content.
    Paragraph(Box<Markup>),
    /// Two trees in sequence.
    Append(Box<Markup>, Box<Markup>),
    /// An identifier, kept as a single token.
    Identifier(String),
    /// A module reference; carries no prose.
    Module(String),
    /// Emphasized content.
    Emphasis(Box<Markup>),
    /// Inline code.
    Monospaced(String),
    /// A bulleted list.
    UnorderedList(Vec<Markup>),
    /// A numbered list.
    OrderedList(Vec<Markup>),
    /// A definition list of (term, definition) pairs.
    DefList(Vec<(Markup, Markup)>),
    /// A code block; carries no prose.
    CodeBlock(String),
    /// A hyperlink with an optional label.
    Hyperlink {
        /// Link target.
        url: String,
        /// Display text, if any.
        label: Option<String>,
    },
    /// An image; carries no prose.
    Picture(String),
    /// An anchor name; carries no prose.
    AName(String),
}

/// What to do with inline code spans during extraction.
///
/// The original behavior drops multi-word spans so identifiers survive
/// but code snippets do not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InlineCodePolicy {
    /// Keep a monospaced span only when it is at most one word.
    #[default]
    DropMultiWord,
    /// Keep every monospaced span.
    Keep,
}

impl Markup {
    /// Fold the tree into its raw token stream.
    ///
    /// Prose is whitespace-split; identifiers enter whole. The result
    /// feeds the normal extraction pipeline.
    pub fn raw_tokens(&self, policy: InlineCodePolicy) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect(policy, &mut out);
        out
    }

    fn collect<'m>(&'m self, policy: InlineCodePolicy, out: &mut Vec<&'m str>) {
        match self {
            Markup::Empty
            | Markup::Module(_)
            | Markup::CodeBlock(_)
            | Markup::Picture(_)
            | Markup::AName(_) => {}
            Markup::Text(s) => out.extend(s.split_whitespace()),
            Markup::Paragraph(d) | Markup::Emphasis(d) => d.collect(policy, out),
            Markup::Append(a, b) => {
                a.collect(policy, out);
                b.collect(policy, out);
            }
            Markup::Identifier(s) => out.push(s.as_str()),
            Markup::Monospaced(s) => match policy {
                InlineCodePolicy::Keep => out.extend(s.split_whitespace()),
                InlineCodePolicy::DropMultiWord => {
                    let mut words = s.split_whitespace();
                    if let Some(first) = words.next() {
                        if words.next().is_none() {
                            out.push(first);
                        }
                    }
                }
            },
            Markup::UnorderedList(items) | Markup::OrderedList(items) => {
                for item in items {
                    item.collect(policy, out);
                }
            }
            Markup::DefList(pairs) => {
                for (term, def) in pairs {
                    term.collect(policy, out);
                    def.collect(policy, out);
                }
            }
            Markup::Hyperlink { label, .. } => {
                if let Some(label) = label {
                    out.extend(label.split_whitespace());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Markup {
        Markup::Text(s.to_string())
    }

    fn tokens(m: &Markup) -> Vec<&str> {
        m.raw_tokens(InlineCodePolicy::DropMultiWord)
    }

    #[test]
    fn test_empty_and_structural_nodes_yield_nothing() {
        assert!(tokens(&Markup::Empty).is_empty());
        assert!(tokens(&Markup::Module("Data.List".into())).is_empty());
        assert!(tokens(&Markup::CodeBlock("main = pure ()".into())).is_empty());
        assert!(tokens(&Markup::Picture("logo.png".into())).is_empty());
        assert!(tokens(&Markup::AName("anchor".into())).is_empty());
    }

    #[test]
    fn test_text_is_whitespace_split() {
        assert_eq!(tokens(&text("lazy list functions")), vec!["lazy", "list", "functions"]);
    }

    #[test]
    fn test_append_preserves_order() {
        let m = Markup::Append(Box::new(text("first")), Box::new(text("second")));
        assert_eq!(tokens(&m), vec!["first", "second"]);
    }

    #[test]
    fn test_paragraph_and_emphasis_are_transparent() {
        let m = Markup::Paragraph(Box::new(Markup::Emphasis(Box::new(text("inner")))));
        assert_eq!(tokens(&m), vec!["inner"]);
    }

    #[test]
    fn test_identifier_enters_whole() {
        let m = Markup::Identifier("Data.Map.lookup".into());
        assert_eq!(tokens(&m), vec!["Data.Map.lookup"]);
    }

    #[test]
    fn test_monospaced_single_word_kept() {
        assert_eq!(tokens(&Markup::Monospaced("foldr".into())), vec!["foldr"]);
    }

    #[test]
    fn test_monospaced_multi_word_dropped() {
        assert!(tokens(&Markup::Monospaced("x <- readLn".into())).is_empty());
    }

    #[test]
    fn test_monospaced_keep_policy() {
        let m = Markup::Monospaced("x <- readLn".into());
        assert_eq!(m.raw_tokens(InlineCodePolicy::Keep), vec!["x", "<-", "readLn"]);
    }

    #[test]
    fn test_lists_concatenate_children() {
        let m = Markup::UnorderedList(vec![text("one"), text("two three")]);
        assert_eq!(tokens(&m), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_def_list_contributes_both_parts() {
        let m = Markup::DefList(vec![(text("key"), text("meaning"))]);
        assert_eq!(tokens(&m), vec!["key", "meaning"]);
    }

    #[test]
    fn test_hyperlink_label() {
        let labelled = Markup::Hyperlink {
            url: "https://example.com".into(),
            label: Some("the docs".into()),
        };
        assert_eq!(tokens(&labelled), vec!["the", "docs"]);

        let bare = Markup::Hyperlink {
            url: "https://example.com".into(),
            label: None,
        };
        assert!(tokens(&bare).is_empty());
    }
}
