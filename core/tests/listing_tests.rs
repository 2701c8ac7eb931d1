use blogdex_core::filters::PostListCriteria;
use blogdex_core::listing::{
    adjacent_posts, filter_and_sort_posts, paginate, sort_posts_by_published_date, DateRange,
    ListingState, SortOrder, DEFAULT_PAGE_SIZE,
};
use blogdex_core::PostSummary;

fn post(id: &str, date: &str, reading_time_min: u32) -> PostSummary {
    let mut post = PostSummary {
        id: id.into(),
        title: id.into(),
        published_date: date.into(),
        search_text: format!("{id} post"),
        reading_time_min,
        ..Default::default()
    };
    post.derive_fields();
    post
}

fn corpus() -> Vec<PostSummary> {
    vec![
        post("mid", "2024-02-01", 10),
        post("old", "2024-01-01", 4),
        post("new", "2024-03-01", 20),
    ]
}

#[test]
fn comparator_orders_both_ways() {
    let posts = corpus();
    let mut asc = posts.clone();
    asc.sort_by(|a, b| sort_posts_by_published_date(a, b, SortOrder::Asc));
    assert_eq!(asc.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["old", "mid", "new"]);

    let mut desc = posts.clone();
    desc.sort_by(|a, b| sort_posts_by_published_date(a, b, SortOrder::Desc));
    assert_eq!(desc.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(), vec!["new", "mid", "old"]);
}

#[test]
fn permissive_criteria_keep_every_post() {
    let posts = corpus();
    let result = filter_and_sort_posts(&posts, &PostListCriteria::default(), SortOrder::Desc);
    assert_eq!(result.len(), posts.len());
    assert_eq!(result[0].id, "new");
}

#[test]
fn filtering_happens_before_sorting() {
    let posts = corpus();
    let criteria = PostListCriteria {
        reading_time: blogdex_core::filters::ReadingTimeRange::Min15Plus,
        ..Default::default()
    };
    let result = filter_and_sort_posts(&posts, &criteria, SortOrder::Desc);
    // The filtered length is the true total for "showing N of M" counts.
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, "new");
}

#[test]
fn pagination_is_one_indexed_and_bounded() {
    let posts: Vec<PostSummary> =
        (0..7).map(|i| post(&format!("p{i}"), "2024-01-01", 5)).collect();
    assert_eq!(paginate(&posts, 1, 3).len(), 3);
    assert_eq!(paginate(&posts, 3, 3).len(), 1);
    assert!(paginate(&posts, 4, 3).is_empty());
    assert!(paginate(&posts, 0, 3).is_empty());
    assert!(paginate(&posts, 1, 0).is_empty());
    assert_eq!(paginate(&posts, 2, 3)[0].id, "p3");
}

#[test]
fn adjacent_posts_in_newest_first_order() {
    let mut ordered = corpus();
    ordered.sort_by(|a, b| sort_posts_by_published_date(a, b, SortOrder::Desc));

    let middle = adjacent_posts("mid", &ordered);
    assert_eq!(middle.previous.unwrap().id, "old");
    assert_eq!(middle.next.unwrap().id, "new");

    let newest = adjacent_posts("new", &ordered);
    assert_eq!(newest.previous.unwrap().id, "mid");
    assert!(newest.next.is_none());

    let oldest = adjacent_posts("old", &ordered);
    assert!(oldest.previous.is_none());
    assert_eq!(oldest.next.unwrap().id, "mid");

    let missing = adjacent_posts("unknown", &ordered);
    assert!(missing.previous.is_none() && missing.next.is_none());
}

#[test]
fn listing_state_transitions_reset_the_page() {
    let mut state = ListingState::default();
    assert_eq!(state.page, 1);
    assert_eq!(state.page_size, DEFAULT_PAGE_SIZE);

    state.set_page(4);
    state.set_query("rust");
    assert_eq!(state.page, 1);

    state.set_page(3);
    state.set_page_size(10);
    assert_eq!(state.page, 1);
    assert_eq!(state.page_size, 10);

    state.set_page(2);
    state.set_selected_topics(vec!["topic1".into()]);
    assert_eq!(state.page, 1);

    state.set_page(2);
    state.set_date_range(DateRange {
        start_date: Some("2024-01-01".into()),
        end_date: None,
    });
    assert_eq!(state.page, 1);

    state.set_locale(Some("tr".into()));
    state.reset_filters();
    assert_eq!(state.query, "");
    assert!(state.selected_topics.is_empty());
    assert_eq!(state.sort_order, SortOrder::Desc);
    assert_eq!(state.locale.as_deref(), Some("tr"));
}
