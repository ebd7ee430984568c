use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::Result;
use crate::index::{DocId, Index, Posting};
use crate::query::{NodeKind, Query};

/// Outward result record: the fields a presentation layer needs to render a
/// result card. The full document stays available through the store.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub crawled_at: Option<String>,
    pub score: f32,
}

impl Index {
    /// The single query surface: parse `raw`, rank matches, and materialize
    /// result cards. `limit` caps the result count; `None` is unbounded.
    pub fn search(&self, raw: &str, limit: Option<usize>) -> Result<Vec<SearchHit>> {
        let query = Query::parse(raw)?;
        let ranked = execute(&query, self, limit);
        Ok(ranked
            .into_iter()
            .filter_map(|(doc_id, score)| {
                self.store.get(doc_id).map(|doc| SearchHit {
                    id: doc.id.clone(),
                    url: doc.url.clone(),
                    title: doc.title.clone(),
                    description: doc.description.clone(),
                    crawled_at: doc.crawled_at.clone(),
                    score,
                })
            })
            .collect())
    }
}

/// Evaluate a structured query against an index.
///
/// Required nodes intersect: a document must satisfy every one of them in at
/// least one field. Optional nodes add score to documents already in the
/// candidate set; when the query has no required nodes at all, the candidate
/// set is the union of optional matches. Scores sum tf × field-weight over
/// every node/field match. Ordering is score descending, then doc id
/// ascending, so identical rebuilds rank identically.
pub fn execute(query: &Query, index: &Index, limit: Option<usize>) -> Vec<(DocId, f32)> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut required: Option<HashMap<DocId, f32>> = None;
    let mut optional: HashMap<DocId, f32> = HashMap::new();

    for node in &query.nodes {
        let matched = match_node(&node.kind, index);
        if node.required {
            let merged = match required.take() {
                None => matched,
                Some(mut acc) => {
                    let mut next = HashMap::new();
                    for (doc_id, score) in matched {
                        if let Some(prev) = acc.remove(&doc_id) {
                            next.insert(doc_id, prev + score);
                        }
                    }
                    next
                }
            };
            if merged.is_empty() {
                // a required node nobody satisfies empties the whole result
                return Vec::new();
            }
            required = Some(merged);
        } else {
            for (doc_id, score) in matched {
                *optional.entry(doc_id).or_insert(0.0) += score;
            }
        }
    }

    let candidates = match required {
        Some(mut req) => {
            for (doc_id, score) in optional {
                if let Some(total) = req.get_mut(&doc_id) {
                    *total += score;
                }
            }
            req
        }
        None => optional,
    };

    let mut ranked: Vec<(DocId, f32)> = candidates.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Documents matching one node, with the node's additive score contribution.
fn match_node(kind: &NodeKind, index: &Index) -> HashMap<DocId, f32> {
    match kind {
        NodeKind::Term(term) => {
            let mut scores = HashMap::new();
            if let Some(plist) = index.inverted.postings(term) {
                for p in plist {
                    *scores.entry(p.doc_id).or_insert(0.0) += p.tf as f32 * p.field.weight();
                }
            }
            scores
        }
        NodeKind::Phrase(phrase_terms) => match_phrase(phrase_terms, index),
    }
}

/// Phrase matching over positions: the phrase matches a (document, field)
/// only if its terms appear there at consecutive position indices. Each
/// matching field contributes the sum of the terms' frequencies × weight.
fn match_phrase(phrase_terms: &[String], index: &Index) -> HashMap<DocId, f32> {
    let mut scores = HashMap::new();
    let Some(first_term) = phrase_terms.first() else {
        return scores;
    };
    let Some(first) = index.inverted.postings(first_term) else {
        return scores;
    };
    let rest: Option<Vec<&[Posting]>> = phrase_terms[1..]
        .iter()
        .map(|t| index.inverted.postings(t))
        .collect();
    let Some(rest) = rest else {
        return scores;
    };

    'anchors: for anchor in first {
        // candidate start positions within this (doc, field)
        let mut starts = anchor.positions.clone();
        let mut tf_sum = anchor.tf;
        for (offset, plist) in rest.iter().enumerate() {
            let Ok(at) = plist
                .binary_search_by_key(&(anchor.doc_id, anchor.field), |p| (p.doc_id, p.field))
            else {
                continue 'anchors;
            };
            let posting = &plist[at];
            let step = (offset + 1) as u32;
            starts.retain(|&s| posting.positions.binary_search(&(s + step)).is_ok());
            if starts.is_empty() {
                continue 'anchors;
            }
            tf_sum += posting.tf;
        }
        *scores.entry(anchor.doc_id).or_insert(0.0) +=
            tf_sum as f32 * anchor.field.weight();
    }
    scores
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    fn corpus() -> Index {
        Index::build([
            Document {
                id: "1".into(),
                title: "the quick brown fox".into(),
                ..Default::default()
            },
            Document {
                id: "2".into(),
                title: "brown bears".into(),
                paragraphs: vec!["a quick note".into()],
                ..Default::default()
            },
        ])
        .unwrap()
    }

    fn ids(index: &Index, raw: &str) -> Vec<String> {
        index
            .search(raw, None)
            .unwrap()
            .into_iter()
            .map(|hit| hit.id)
            .collect()
    }

    #[test]
    fn phrase_is_order_sensitive() {
        let index = corpus();
        assert_eq!(ids(&index, r#""quick brown""#), vec!["1"]);
        assert!(ids(&index, r#""brown quick""#).is_empty());
    }

    #[test]
    fn optional_terms_only_boost_required_matches() {
        let index = corpus();
        // "fox" required: doc 2 is excluded even though it matches "brown"
        assert_eq!(ids(&index, "+fox brown"), vec!["1"]);
    }

    #[test]
    fn all_optional_query_unions_matches() {
        use crate::query::QueryNode;
        let index = corpus();
        let query = Query {
            nodes: vec![
                QueryNode {
                    kind: NodeKind::Term("fox".into()),
                    required: false,
                },
                QueryNode {
                    kind: NodeKind::Term("note".into()),
                    required: false,
                },
            ],
        };
        let ranked = execute(&query, &index, None);
        // no required nodes: candidates are the union of optional matches
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn ties_break_by_ingestion_order() {
        let index = Index::build([
            Document {
                id: "b".into(),
                title: "identical words".into(),
                ..Default::default()
            },
            Document {
                id: "a".into(),
                title: "identical words".into(),
                ..Default::default()
            },
        ])
        .unwrap();
        assert_eq!(ids(&index, "identical"), vec!["b", "a"]);
    }

    #[test]
    fn limit_truncates() {
        let index = corpus();
        let hits = index.search("brown", Some(1)).unwrap();
        assert_eq!(hits.len(), 1);
    }
}
