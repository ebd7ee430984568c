use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// A crawled page as it appears in the snapshot. Immutable once indexed.
///
/// Only `id` is mandatory; the index builder rejects records where it is
/// missing or blank. Every other field defaults to empty/absent so partial
/// crawl records still ingest.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// One entry per extracted heading element.
    #[serde(default)]
    pub headings: Vec<String>,
    /// One entry per extracted paragraph element.
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(default)]
    pub link_count: u32,
    /// RFC 3339, as emitted by the crawler.
    #[serde(default)]
    pub crawled_at: Option<String>,
    #[serde(default = "default_status")]
    pub status_code: u16,
}

fn default_status() -> u16 {
    200
}

impl Document {
    /// Text of one indexed field; multi-valued fields joined with newlines.
    pub fn field_text(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Url => Cow::Borrowed(self.url.as_str()),
            Field::Title => Cow::Borrowed(self.title.as_str()),
            Field::Description => Cow::Borrowed(self.description.as_str()),
            Field::Headings => Cow::Owned(self.headings.join("\n")),
            Field::Paragraphs => Cow::Owned(self.paragraphs.join("\n")),
        }
    }
}

/// The indexed fields of a [`Document`]. Postings record which field a term
/// occurred in so ranking can weight a title hit above a body hit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Field {
    Url,
    Title,
    Description,
    Headings,
    Paragraphs,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Url,
        Field::Title,
        Field::Description,
        Field::Headings,
        Field::Paragraphs,
    ];

    /// Fixed ranking weight. Stable across runs; scores are comparable
    /// between identical rebuilds of the same snapshot.
    pub fn weight(self) -> f32 {
        match self {
            Field::Title => 5.0,
            Field::Description => 3.0,
            Field::Headings => 2.0,
            Field::Url => 1.5,
            Field::Paragraphs => 1.0,
        }
    }
}
