//! Topic-weighted related-posts scoring.
//!
//! Plain shared-topic counting over-weights generic topics, so shared topics
//! are weighted by a smoothed inverse document frequency: rare topics are more
//! distinguishing than ones that appear on nearly every post. Selection is
//! two-tier: candidates clearing a minimum score fill the slots first, weaker
//! positive-score candidates backfill whatever remains so thin corpora still
//! surface something.

use std::collections::{HashMap, HashSet};

use crate::post::PostSummary;

/// Candidates at or above this score are "strong" matches.
pub const MIN_STRONG_SCORE: f64 = 0.5;
pub const DEFAULT_LIMIT: usize = 3;

/// A candidate with its shared-topic occurrence count and idf-weighted score.
#[derive(Debug)]
pub struct RelatedCandidate<'a> {
    pub post: &'a PostSummary,
    pub shared_count: u32,
    pub score: f64,
}

/// Raw topic-id occurrence counts across the corpus. Duplicate ids within one
/// post's topic list are counted as separate occurrences, matching the
/// document-frequency definition used when the corpus was first tuned; empty
/// ids are skipped entirely.
pub fn topic_occurrences(posts: &[PostSummary]) -> HashMap<&str, u32> {
    let mut occurrences: HashMap<&str, u32> = HashMap::new();
    for post in posts {
        for topic in &post.topics {
            if topic.id.is_empty() {
                continue;
            }
            *occurrences.entry(topic.id.as_str()).or_insert(0) += 1;
        }
    }
    occurrences
}

/// Smoothed inverse document frequency: `ln((N + 1) / (freq + 1))`. Near zero
/// for topics present on almost every post, larger for rare ones.
fn smoothed_idf(total_posts: usize, occurrences: u32) -> f64 {
    ((total_posts as f64 + 1.0) / (occurrences as f64 + 1.0)).ln()
}

/// Every candidate sharing at least one valid topic with `post`, ordered by
/// score descending, then shared count, then published date descending. The
/// focal post itself never appears.
pub fn ranked_candidates<'a>(post: &PostSummary, all_posts: &'a [PostSummary]) -> Vec<RelatedCandidate<'a>> {
    let focal_topic_ids: HashSet<&str> = post
        .topics
        .iter()
        .filter(|topic| !topic.id.is_empty())
        .map(|topic| topic.id.as_str())
        .collect();
    if focal_topic_ids.is_empty() {
        return Vec::new();
    }

    let occurrences = topic_occurrences(all_posts);
    let total_posts = all_posts.len();

    let mut candidates: Vec<RelatedCandidate<'a>> = Vec::new();
    for candidate in all_posts {
        if candidate.id == post.id {
            continue;
        }
        let mut shared_count = 0u32;
        let mut score = 0.0f64;
        for topic in &candidate.topics {
            if topic.id.is_empty() || !focal_topic_ids.contains(topic.id.as_str()) {
                continue;
            }
            shared_count += 1;
            score += smoothed_idf(total_posts, occurrences.get(topic.id.as_str()).copied().unwrap_or(0));
        }
        if shared_count == 0 {
            continue;
        }
        candidates.push(RelatedCandidate { post: candidate, shared_count, score });
    }

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.shared_count.cmp(&a.shared_count))
            .then_with(|| b.post.published_ms.cmp(&a.post.published_ms))
    });
    candidates
}

/// Up to `limit` related posts for `post`. Strong matches (score >=
/// [`MIN_STRONG_SCORE`]) come first in ranked order; remaining slots are
/// backfilled with positive-score candidates in the same order. A post with
/// no valid topics has no related posts.
pub fn related_posts(post: &PostSummary, all_posts: &[PostSummary], limit: usize) -> Vec<PostSummary> {
    let candidates = ranked_candidates(post, all_posts);

    let mut related: Vec<PostSummary> = Vec::new();
    for candidate in &candidates {
        if related.len() == limit {
            break;
        }
        if candidate.score >= MIN_STRONG_SCORE {
            related.push(candidate.post.clone());
        }
    }
    if related.len() < limit {
        for candidate in &candidates {
            if related.len() == limit {
                break;
            }
            if candidate.score >= MIN_STRONG_SCORE || candidate.score <= 0.0 {
                continue;
            }
            related.push(candidate.post.clone());
        }
    }
    related
}
