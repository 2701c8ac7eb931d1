use blogdex_core::related::{ranked_candidates, related_posts, MIN_STRONG_SCORE};
use blogdex_core::{PostSummary, Topic};

fn topic(id: &str) -> Topic {
    Topic { id: id.into(), name: id.to_uppercase(), color: String::new() }
}

fn post(id: &str, date: &str, topic_ids: &[&str]) -> PostSummary {
    let mut post = PostSummary {
        id: id.into(),
        title: id.into(),
        published_date: date.into(),
        topics: topic_ids.iter().map(|t| topic(t)).collect(),
        ..Default::default()
    };
    post.derive_fields();
    post
}

#[test]
fn no_topics_means_no_related_posts() {
    let corpus = vec![
        post("a", "2024-01-20", &[]),
        post("b", "2024-01-19", &["topic1"]),
    ];
    assert!(related_posts(&corpus[0], &corpus, 3).is_empty());
}

#[test]
fn empty_topic_ids_are_ignored_entirely() {
    let corpus = vec![
        post("a", "2024-01-20", &["", ""]),
        post("b", "2024-01-19", &["topic1"]),
    ];
    assert!(related_posts(&corpus[0], &corpus, 3).is_empty());
}

#[test]
fn focal_post_never_appears_in_its_own_results() {
    let corpus = vec![
        post("a", "2024-01-20", &["topic1"]),
        post("b", "2024-01-19", &["topic1"]),
    ];
    let related = related_posts(&corpus[0], &corpus, 5);
    assert!(related.iter().all(|p| p.id != "a"));
}

#[test]
fn output_is_bounded_by_limit() {
    let corpus = vec![
        post("a", "2024-01-20", &["topic1"]),
        post("b", "2024-01-19", &["topic1"]),
        post("c", "2024-01-18", &["topic1"]),
        post("d", "2024-01-17", &["topic1"]),
    ];
    assert!(related_posts(&corpus[0], &corpus, 2).len() <= 2);
    assert!(related_posts(&corpus[0], &corpus, 0).is_empty());
}

#[test]
fn shared_rare_topics_rank_by_recency_on_ties() {
    // A shares topic1 with B and topic2 with C; D shares nothing. Both shared
    // topics appear in two posts each, so the idf weights tie and recency
    // decides: B is newer than C.
    let corpus = vec![
        post("a", "2024-01-20", &["topic1", "topic2"]),
        post("b", "2024-01-19", &["topic1"]),
        post("c", "2024-01-18", &["topic2"]),
        post("d", "2024-01-17", &["topic3"]),
    ];
    let related = related_posts(&corpus[0], &corpus, 2);
    let ids: Vec<&str> = related.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c"]);
}

#[test]
fn tie_on_score_and_shared_count_resolved_by_date() {
    let corpus = vec![
        post("base", "2024-01-20", &["topic1"]),
        post("older", "2024-01-01", &["topic1"]),
        post("newer", "2024-01-19", &["topic1"]),
        post("other", "2024-01-10", &["topic2"]),
    ];
    let related = related_posts(&corpus[0], &corpus, 2);
    let ids: Vec<&str> = related.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["newer", "older"]);
}

#[test]
fn weak_matches_backfill_when_strong_ones_run_out() {
    // One rare topic and one widespread topic split the candidates into a
    // strong tier and a weak tier.
    let corpus = vec![
        post("base", "2024-01-20", &["common", "rare"]),
        post("strong", "2024-01-10", &["rare"]),
        post("weak-a", "2024-01-19", &["common"]),
        post("weak-b", "2024-01-18", &["common"]),
        post("filler-1", "2024-01-01", &["common"]),
        post("filler-2", "2024-01-02", &["common"]),
    ];
    // "common" occurs in 5 of 6 posts: idf = ln(7/6) ~= 0.154, well below the
    // strong threshold. "rare" occurs in 2: idf = ln(7/3) ~= 0.847, strong.
    let candidates = ranked_candidates(&corpus[0], &corpus);
    assert!(candidates[0].score >= MIN_STRONG_SCORE);
    assert!(candidates[1].score < MIN_STRONG_SCORE);

    let related = related_posts(&corpus[0], &corpus, 3);
    let ids: Vec<&str> = related.iter().map(|p| p.id.as_str()).collect();
    // The strong match leads even though the weak ones are newer; weak
    // matches backfill in ranked order (recency, since their scores tie).
    assert_eq!(ids, vec!["strong", "weak-a", "weak-b"]);
}

#[test]
fn duplicate_topic_ids_count_as_repeat_occurrences() {
    // The candidate lists the shared topic twice; raw occurrence counting
    // doubles both its shared count and its accumulated score.
    let corpus = vec![
        post("base", "2024-01-20", &["topic1"]),
        post("duplicated", "2024-01-01", &["topic1", "topic1"]),
        post("single", "2024-01-19", &["topic1"]),
        post("noise-1", "2024-01-05", &["topic8"]),
        post("noise-2", "2024-01-06", &["topic9"]),
    ];
    let candidates = ranked_candidates(&corpus[0], &corpus);
    assert_eq!(candidates[0].post.id, "duplicated");
    assert_eq!(candidates[0].shared_count, 2);
    assert!(candidates[0].score > candidates[1].score);
}

#[test]
fn candidates_sharing_nothing_are_discarded() {
    let corpus = vec![
        post("base", "2024-01-20", &["topic1"]),
        post("unrelated", "2024-01-19", &["topic9"]),
    ];
    assert!(ranked_candidates(&corpus[0], &corpus).is_empty());
}
