//! Client-side helpers for engagement counts (likes, hits). The remote API is
//! an external collaborator; these functions only shape its payloads for
//! display, clamping anything numeric to non-negative integers.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// `None` means "unknown, not yet loaded" and renders as a placeholder, which
/// is why missing entries are seeded with `None` rather than 0.
pub type LikesByPostId = HashMap<String, Option<u64>>;

lazy_static! {
    static ref TRACKABLE_ID_RE: Regex =
        Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex");
}

/// Clamp a raw metric value from the engagement API to a non-negative integer.
/// NaN, infinities, and negatives all collapse to 0.
pub fn clamp_metric(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.floor() as u64
}

/// Merge a fetched like-count payload into the existing map for exactly the
/// ids in `post_ids`. Ids absent from `loaded` are seeded with `None`; ids
/// outside the request scope are left untouched.
pub fn merge_loaded_likes_by_post_id(
    existing: &LikesByPostId,
    post_ids: &[String],
    loaded: Option<&HashMap<String, f64>>,
) -> LikesByPostId {
    let mut merged = existing.clone();
    for id in post_ids {
        let value = loaded
            .and_then(|counts| counts.get(id))
            .map(|count| clamp_metric(*count));
        merged.insert(id.clone(), value);
    }
    merged
}

/// Whether an id is safe to send to the hit/like tracking endpoints: a
/// lowercase alphanumeric-and-hyphen slug of at least two characters.
pub fn is_trackable_post_id(id: &str) -> bool {
    id.chars().count() >= 2 && TRACKABLE_ID_RE.is_match(id)
}
