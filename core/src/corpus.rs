//! The in-memory post collection for one locale, loaded once per build from
//! the content-sync output and treated as an immutable snapshot. The fuzzy
//! search index is built lazily and owned by the corpus, so replacing the
//! corpus (locale switch, content reload) drops the stale index with it.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::post::PostSummary;
use crate::search::{RankedPost, SearchIndex};

pub struct Corpus {
    posts: Vec<PostSummary>,
    index: RwLock<Option<Arc<SearchIndex>>>,
}

impl Corpus {
    /// Wrap a post collection, deriving per-post fields once up front.
    pub fn new(mut posts: Vec<PostSummary>) -> Self {
        for post in &mut posts {
            post.derive_fields();
            if post.published_ms == 0 {
                tracing::warn!(post_id = %post.id, date = %post.published_date, "unparseable published date");
            }
        }
        Self { posts, index: RwLock::new(None) }
    }

    /// Load `posts.<locale>.json` from `dir`. A missing index file is a valid
    /// empty corpus, not an error; a present but malformed file is an error.
    pub fn load(dir: &Path, locale: &str) -> Result<Self> {
        let path = dir.join(format!("posts.{locale}.json"));
        if !path.exists() {
            tracing::warn!(path = %path.display(), "posts index missing, using empty corpus");
            return Ok(Self::new(Vec::new()));
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading posts index {}", path.display()))?;
        let posts: Vec<PostSummary> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing posts index {}", path.display()))?;
        tracing::info!(locale, posts = posts.len(), "loaded posts index");
        Ok(Self::new(posts))
    }

    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn find(&self, post_id: &str) -> Option<&PostSummary> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    /// The fuzzy search index for this corpus, built on first use. The index
    /// lives exactly as long as the corpus, never longer.
    pub fn search_index(&self) -> Arc<SearchIndex> {
        if let Some(index) = self.index.read().as_ref() {
            return Arc::clone(index);
        }
        let mut slot = self.index.write();
        if let Some(index) = slot.as_ref() {
            return Arc::clone(index);
        }
        let built = Arc::new(SearchIndex::build(&self.posts));
        *slot = Some(Arc::clone(&built));
        built
    }

    /// Ranked fuzzy search through the cached index.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<RankedPost> {
        self.search_index().search(&self.posts, query, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostSummary;

    fn post(id: &str, date: &str, search_text: &str) -> PostSummary {
        PostSummary {
            id: id.into(),
            published_date: date.into(),
            search_text: search_text.into(),
            ..Default::default()
        }
    }

    #[test]
    fn derives_timestamps_on_construction() {
        let corpus = Corpus::new(vec![post("a", "2024-01-15", "alpha")]);
        assert!(corpus.posts()[0].published_ms > 0);
    }

    #[test]
    fn index_is_built_once_and_shared() {
        let corpus = Corpus::new(vec![post("a", "2024-01-15", "alpha"), post("b", "2024-01-16", "beta")]);
        let first = corpus.search_index();
        let second = corpus.search_index();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn empty_corpus_searches_cleanly() {
        let corpus = Corpus::new(Vec::new());
        assert!(corpus.search("anything", Some(1)).is_empty());
        assert!(corpus.search("", Some(1)).is_empty());
    }
}
