use serde::{Deserialize, Serialize};

/// Origin of a post: written for the local blog or imported from an external feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Blog,
    Medium,
}

impl Source {
    /// Blog posts sort ahead of any external source in search results.
    pub fn rank(self) -> u8 {
        match self {
            Source::Blog => 0,
            Source::Medium => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Lowercase slug, unique per locale. Entries with an empty id are
    /// ignored by all scoring and counting logic.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
}

/// A single article as surfaced in listings, search, and related-post slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// Unique identifier, stable across locales.
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Normalized concatenation of title + summary + topic names + id, built
    /// at content-sync time. Consumers never re-normalize it differently than
    /// the query normalizer.
    #[serde(default)]
    pub search_text: String,
    pub published_date: String,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub reading_time_min: u32,
    #[serde(default)]
    pub topics: Vec<Topic>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub source: Source,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Millisecond timestamp derived from `published_date` once at corpus
    /// load. Not part of the wire format.
    #[serde(skip)]
    pub published_ms: i64,
}

impl PostSummary {
    /// Fill fields derived from the raw record. Called once per post when the
    /// corpus is loaded; scoring functions read `published_ms` only.
    pub fn derive_fields(&mut self) {
        self.published_ms = crate::dates::parse_ms(&self.published_date).unwrap_or(0);
    }
}
