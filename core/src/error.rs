use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the core. "No results" is never an error; queries over
/// an empty or non-matching index return empty result sets.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A snapshot record without a usable identifier. Aborts the whole
    /// build: a broken record means the snapshot itself is suspect.
    #[error("malformed document at position {ordinal}: {reason}")]
    MalformedDocument { ordinal: usize, reason: String },

    /// A query opened a quote and never closed it.
    #[error("unterminated phrase: missing closing quote")]
    UnterminatedPhrase,

    /// The index directory has no completed build.
    #[error("no built index at {}: run the indexer first", .path.display())]
    IndexNotBuilt { path: PathBuf },

    #[error("index io: {0}")]
    Io(#[from] std::io::Error),

    #[error("index data: {0}")]
    Codec(#[from] bincode::Error),

    #[error("index metadata: {0}")]
    Meta(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SearchError>;
