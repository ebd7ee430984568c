use crate::error::{Result, SearchError};
use crate::tokenizer;

/// What a query node matches: a single term, or a phrase whose terms must
/// appear at consecutive positions within one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Term(String),
    Phrase(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryNode {
    pub kind: NodeKind,
    pub required: bool,
}

/// A parsed free-text query. Terms are already normalized through the same
/// tokenizer the index builder uses, so lookups match exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub nodes: Vec<QueryNode>,
}

impl Query {
    /// Parse a raw query string.
    ///
    /// Whitespace separates tokens; a double-quoted span is a phrase group;
    /// a `+` prefix marks a token or phrase required. When no `+` appears
    /// anywhere, every node is required (free-text "all terms must appear").
    /// With at least one marker, unmarked nodes become optional.
    ///
    /// Tokens that normalize to nothing (punctuation, stopwords) are
    /// dropped; a phrase left with a single term degrades to a plain term.
    /// Empty input parses to an empty query, which executes to zero results.
    ///
    /// Fails with [`SearchError::UnterminatedPhrase`] when a quote is opened
    /// but never closed; callers surface the error rather than guessing at
    /// intent.
    pub fn parse(raw: &str) -> Result<Query> {
        let mut parsed: Vec<(NodeKind, bool)> = Vec::new();
        let mut rest = raw;

        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }

            let mut marked = false;
            if let Some(stripped) = rest.strip_prefix('+') {
                marked = true;
                rest = stripped;
            }

            if let Some(stripped) = rest.strip_prefix('"') {
                let end = stripped
                    .find('"')
                    .ok_or(SearchError::UnterminatedPhrase)?;
                let body = &stripped[..end];
                rest = &stripped[end + 1..];
                let mut terms = tokenizer::terms(body);
                match terms.len() {
                    0 => {}
                    1 => parsed.push((NodeKind::Term(terms.remove(0)), marked)),
                    _ => parsed.push((NodeKind::Phrase(terms), marked)),
                }
            } else {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                let word = &rest[..end];
                rest = &rest[end..];
                for term in tokenizer::terms(word) {
                    parsed.push((NodeKind::Term(term), marked));
                }
            }
        }

        let any_marker = parsed.iter().any(|&(_, marked)| marked);
        let nodes = parsed
            .into_iter()
            .map(|(kind, marked)| QueryNode {
                kind,
                required: marked || !any_marker,
            })
            .collect();
        Ok(Query { nodes })
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
