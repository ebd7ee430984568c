pub mod document;
pub mod error;
pub mod index;
pub mod persist;
pub mod query;
pub mod search;
pub mod tokenizer;

pub use document::{Document, Field};
pub use error::SearchError;
pub use index::{DocId, DocumentStore, Index, InvertedIndex, Posting, TermId};
pub use query::{NodeKind, Query, QueryNode};
pub use search::{execute, SearchHit};
