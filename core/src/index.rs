use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{Document, Field};
use crate::error::{Result, SearchError};
use crate::tokenizer::tokenize;

pub type TermId = u32;
pub type DocId = u32;

/// One (document, field) occurrence list for a term: how often the term
/// appears in that field and at which token positions. Positions drive
/// phrase matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub field: Field,
    pub tf: u32,
    /// Ascending token positions of the term within the field.
    pub positions: Vec<u32>,
}

/// Term → postings mapping. Term ids are assigned in first-occurrence order
/// over the document sequence, so identical snapshots build identical
/// indexes. Postings lists are ordered by (doc_id, field).
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub dictionary: HashMap<String, TermId>,
    pub postings: Vec<Vec<Posting>>,
}

impl InvertedIndex {
    /// Postings for an already-normalized term, if it occurs anywhere.
    pub fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.dictionary
            .get(term)
            .map(|&tid| self.postings[tid as usize].as_slice())
    }

    pub fn num_terms(&self) -> usize {
        self.dictionary.len()
    }
}

/// Document id → document, plus the external-identifier lookup used by the
/// display layer.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DocumentStore {
    docs: HashMap<DocId, Document>,
    by_external: HashMap<String, DocId>,
}

impl DocumentStore {
    pub fn get(&self, doc_id: DocId) -> Option<&Document> {
        self.docs.get(&doc_id)
    }

    pub fn get_by_id(&self, external_id: &str) -> Option<(DocId, &Document)> {
        let doc_id = *self.by_external.get(external_id)?;
        Some((doc_id, &self.docs[&doc_id]))
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// A built, immutable search index over one snapshot. Construction is
/// single-threaded; afterwards the index is read-only and may be queried
/// concurrently without synchronization.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Index {
    pub inverted: InvertedIndex,
    pub store: DocumentStore,
}

impl Index {
    /// Build an index from a document sequence.
    ///
    /// Internal doc ids are assigned densely in input order; rebuilding from
    /// the same sequence yields a structurally identical index. A document
    /// with no indexable text still lands in the store (findable by id) but
    /// contributes no postings.
    ///
    /// Aborts with [`SearchError::MalformedDocument`] on a missing, blank, or
    /// duplicate identifier rather than skipping the record: a broken record
    /// means the snapshot itself needs attention.
    pub fn build<I>(documents: I) -> Result<Index>
    where
        I: IntoIterator<Item = Document>,
    {
        let mut store = DocumentStore::default();
        let mut dictionary: HashMap<String, TermId> = HashMap::new();
        let mut postings: Vec<Vec<Posting>> = Vec::new();

        for (ordinal, doc) in documents.into_iter().enumerate() {
            if doc.id.trim().is_empty() {
                return Err(SearchError::MalformedDocument {
                    ordinal,
                    reason: "missing identifier".into(),
                });
            }
            if store.by_external.contains_key(&doc.id) {
                return Err(SearchError::MalformedDocument {
                    ordinal,
                    reason: format!("duplicate identifier {:?}", doc.id),
                });
            }

            let doc_id = store.docs.len() as DocId;
            for field in Field::ALL {
                let text = doc.field_text(field);
                // tf and positions per term within this field
                let mut accum: HashMap<TermId, (u32, Vec<u32>)> = HashMap::new();
                for (term, pos) in tokenize(&text) {
                    let tid = *dictionary.entry(term).or_insert_with(|| {
                        postings.push(Vec::new());
                        (postings.len() - 1) as TermId
                    });
                    let entry = accum.entry(tid).or_insert_with(|| (0, Vec::new()));
                    entry.0 += 1;
                    entry.1.push(pos as u32);
                }
                for (tid, (tf, positions)) in accum {
                    postings[tid as usize].push(Posting {
                        doc_id,
                        field,
                        tf,
                        positions,
                    });
                }
            }

            store.by_external.insert(doc.id.clone(), doc_id);
            store.docs.insert(doc_id, doc);
        }

        // Canonical order, independent of hash-map iteration during the scan.
        for plist in &mut postings {
            plist.sort_by_key(|p| (p.doc_id, p.field));
        }

        debug!(
            num_docs = store.len(),
            num_terms = dictionary.len(),
            "index built"
        );
        Ok(Index {
            inverted: InvertedIndex {
                dictionary,
                postings,
            },
            store,
        })
    }
}
