//! Fuzzy relevance search over the precomputed `searchText` field.
//!
//! Matching is token-based: each query token must land within an edit-distance
//! budget of some field token, match position within the field is ignored, and
//! a whole-phrase containment discounts the final distance. Distances live in
//! `[0, 1]` where lower is better; the public relevance score inverts that to
//! an integer where higher is better.

use crate::post::PostSummary;
use crate::text;

/// Maximum acceptable per-token and overall distance: roughly a third of the
/// pattern may mismatch before a candidate is rejected.
pub const SCORE_THRESHOLD: f64 = 0.34;
/// Query and field tokens shorter than this never participate in matching.
pub const MIN_MATCH_LENGTH: usize = 2;

/// A post paired with its integer relevance for the query, higher is better.
#[derive(Debug, Clone)]
pub struct RankedPost {
    pub post: PostSummary,
    pub relevance: i64,
}

/// Outcome of normalizing a raw query string.
pub enum ParsedQuery {
    /// Normalizes to nothing; by convention this is "no filter".
    Empty,
    /// Normalized to something, but every token is below the minimum match
    /// length, so nothing can ever match it.
    TooShort,
    Terms(QueryTerms),
}

pub struct QueryTerms {
    normalized: String,
    tokens: Vec<String>,
}

impl ParsedQuery {
    pub fn parse(query: &str) -> Self {
        let normalized = text::normalize(query);
        if normalized.is_empty() {
            return ParsedQuery::Empty;
        }
        let tokens = text::tokenize(query, MIN_MATCH_LENGTH);
        if tokens.is_empty() {
            return ParsedQuery::TooShort;
        }
        ParsedQuery::Terms(QueryTerms { normalized, tokens })
    }
}

struct DocEntry {
    normalized: String,
    tokens: Vec<String>,
}

impl DocEntry {
    fn from_search_text(search_text: &str) -> Self {
        Self {
            normalized: text::normalize(search_text),
            tokens: text::tokenize(search_text, MIN_MATCH_LENGTH),
        }
    }

    /// Distance of this document from the query, or `None` when the document
    /// does not clear the match threshold.
    fn distance(&self, query: &QueryTerms) -> Option<f64> {
        if self.normalized.is_empty() || self.tokens.is_empty() {
            return None;
        }
        let mut total = 0.0;
        for query_token in &query.tokens {
            let mut best = 1.0f64;
            for field_token in &self.tokens {
                let d = token_distance(query_token, field_token);
                if d < best {
                    best = d;
                }
                if best == 0.0 {
                    break;
                }
            }
            if best > SCORE_THRESHOLD {
                return None;
            }
            total += best;
        }
        let mut distance = total / query.tokens.len() as f64;
        if self.normalized.contains(&query.normalized) {
            distance *= 0.72;
        }
        Some(distance.clamp(0.0, 1.0))
    }
}

/// Tokenized view of a corpus, built once and reused across queries. The
/// index is positional: entry `i` describes `posts[i]` of the slice it was
/// built from, so it must be rebuilt whenever the corpus is replaced.
pub struct SearchIndex {
    docs: Vec<DocEntry>,
}

impl SearchIndex {
    pub fn build(posts: &[PostSummary]) -> Self {
        let docs = posts
            .iter()
            .map(|post| DocEntry::from_search_text(&post.search_text))
            .collect();
        Self { docs }
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Rank `posts` against `query`. An empty query returns the collection
    /// untouched (zero relevance); otherwise matched posts are ordered by
    /// source rank (blog first), then match quality, then published date
    /// descending, then id. `limit` caps the result after ordering.
    pub fn search(&self, posts: &[PostSummary], query: &str, limit: Option<usize>) -> Vec<RankedPost> {
        debug_assert_eq!(posts.len(), self.docs.len());
        let terms = match ParsedQuery::parse(query) {
            ParsedQuery::Empty => {
                let mut results: Vec<RankedPost> = posts
                    .iter()
                    .map(|post| RankedPost { post: post.clone(), relevance: 0 })
                    .collect();
                if let Some(limit) = limit {
                    results.truncate(limit);
                }
                return results;
            }
            ParsedQuery::TooShort => return Vec::new(),
            ParsedQuery::Terms(terms) => terms,
        };

        let mut scored: Vec<(usize, f64)> = Vec::new();
        for (idx, entry) in self.docs.iter().enumerate() {
            if let Some(distance) = entry.distance(&terms) {
                scored.push((idx, distance));
            }
        }
        scored.sort_by(|&(a_idx, a_dist), &(b_idx, b_dist)| {
            let a = &posts[a_idx];
            let b = &posts[b_idx];
            a.source
                .rank()
                .cmp(&b.source.rank())
                .then_with(|| a_dist.total_cmp(&b_dist))
                .then_with(|| b.published_ms.cmp(&a.published_ms))
                .then_with(|| a.id.cmp(&b.id))
        });
        if let Some(limit) = limit {
            scored.truncate(limit);
        }
        scored
            .into_iter()
            .map(|(idx, distance)| RankedPost {
                post: posts[idx].clone(),
                relevance: relevance_from_distance(distance),
            })
            .collect()
    }
}

/// One-shot search without a prebuilt index. Hot paths should go through
/// [`crate::Corpus::search`], which caches the index for the corpus lifetime.
pub fn search_posts(posts: &[PostSummary], query: &str, limit: Option<usize>) -> Vec<RankedPost> {
    SearchIndex::build(posts).search(posts, query, limit)
}

/// Integer relevance of a single post for a query: `round((1 - distance) *
/// 1000)` when the post clears the threshold, 0 otherwise. A post matches the
/// query iff this score is positive. Exposed for display and deterministic
/// testing; ordering in [`SearchIndex::search`] uses the raw distance.
pub fn query_relevance_score(post: &PostSummary, query: &str) -> i64 {
    match ParsedQuery::parse(query) {
        ParsedQuery::Empty | ParsedQuery::TooShort => 0,
        ParsedQuery::Terms(terms) => relevance_for_terms(post, &terms),
    }
}

/// Relevance of a single post for an already-parsed query.
pub fn relevance_for_terms(post: &PostSummary, terms: &QueryTerms) -> i64 {
    let entry = DocEntry::from_search_text(&post.search_text);
    match entry.distance(terms) {
        Some(distance) => relevance_from_distance(distance),
        None => 0,
    }
}

fn relevance_from_distance(distance: f64) -> i64 {
    ((1.0 - distance) * 1000.0).round() as i64
}

/// Distance between one query token and one field token in `[0, 1]`.
///
/// Exact match is 0. Containment is discounted in proportion to the extra
/// length of the candidate, except that one- and two-character query tokens
/// must be prefixes to count at all. Everything else falls back to a
/// length-normalized Levenshtein ratio.
fn token_distance(query_token: &str, field_token: &str) -> f64 {
    if query_token == field_token {
        return 0.0;
    }

    let query_len = query_token.chars().count();
    let field_len = field_token.chars().count();
    if query_len == 0 || field_len == 0 {
        return 1.0;
    }

    if field_token.contains(query_token) {
        if query_len <= 2 && !field_token.starts_with(query_token) {
            return 1.0;
        }
        let extra_ratio = (field_len.saturating_sub(query_len)) as f64 / field_len as f64;
        return extra_ratio.clamp(0.0, 1.0) * 0.2;
    }

    let distance = levenshtein(query_token, field_token);
    (distance as f64 / query_len.max(field_len) as f64).clamp(0.0, 1.0)
}

fn levenshtein(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();
    if left.is_empty() {
        return right.len();
    }
    if right.is_empty() {
        return left.len();
    }

    let mut previous: Vec<usize> = (0..=right.len()).collect();
    let mut current = vec![0usize; right.len() + 1];
    for (i, lch) in left.iter().enumerate() {
        current[0] = i + 1;
        for (j, rch) in right.iter().enumerate() {
            let substitution = previous[j] + usize::from(lch != rch);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[right.len()]
}
