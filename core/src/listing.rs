//! Sort order, pagination, adjacent-post lookup, and the serializable listing
//! state that UI surfaces thread through the filter pipeline.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::filters::{matches_post_list_filters, PostListCriteria};
use crate::post::PostSummary;

pub const DEFAULT_PAGE_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Comparator on the millisecond published timestamp. `Asc` is oldest first.
pub fn sort_posts_by_published_date(a: &PostSummary, b: &PostSummary, order: SortOrder) -> Ordering {
    match order {
        SortOrder::Asc => a.published_ms.cmp(&b.published_ms),
        SortOrder::Desc => b.published_ms.cmp(&a.published_ms),
    }
}

/// Filter the corpus, then sort the survivors. Filtering runs first so the
/// result length is the true total for "showing N of M" counts; pagination is
/// a slice on top of this.
pub fn filter_and_sort_posts(
    posts: &[PostSummary],
    criteria: &PostListCriteria,
    order: SortOrder,
) -> Vec<PostSummary> {
    let mut filtered: Vec<PostSummary> = posts
        .iter()
        .filter(|post| matches_post_list_filters(post, criteria))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| sort_posts_by_published_date(a, b, order));
    filtered
}

/// 1-indexed page slice. Out-of-range pages and a zero size yield an empty
/// slice rather than panicking.
pub fn paginate(posts: &[PostSummary], page: usize, size: usize) -> &[PostSummary] {
    if page == 0 || size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(size);
    if start >= posts.len() {
        return &[];
    }
    let end = start.saturating_add(size).min(posts.len());
    &posts[start..end]
}

/// Minimal reference to a neighbouring post for prev/next navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRef {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdjacentPosts {
    /// The older neighbour in a newest-first ordering.
    pub previous: Option<PostRef>,
    /// The newer neighbour.
    pub next: Option<PostRef>,
}

/// Previous/next posts around `post_id` within `ordered_posts`, which must be
/// sorted newest first. An unknown id yields no neighbours.
pub fn adjacent_posts(post_id: &str, ordered_posts: &[PostSummary]) -> AdjacentPosts {
    let Some(index) = ordered_posts.iter().position(|post| post.id == post_id) else {
        return AdjacentPosts::default();
    };
    let to_ref = |post: &PostSummary| PostRef { id: post.id.clone(), title: post.title.clone() };
    AdjacentPosts {
        previous: ordered_posts.get(index + 1).map(to_ref),
        next: index.checked_sub(1).and_then(|i| ordered_posts.get(i)).map(to_ref),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// UI-facing query state for a post list. Transitions are plain methods; every
/// change that can alter the visible set resets the page to 1 so a shrunken
/// result set cannot leave the pager beyond the last page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingState {
    pub query: String,
    pub sort_order: SortOrder,
    pub page: usize,
    pub page_size: usize,
    pub selected_topics: Vec<String>,
    pub date_range: DateRange,
    pub locale: Option<String>,
}

impl Default for ListingState {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort_order: SortOrder::Desc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            selected_topics: Vec::new(),
            date_range: DateRange::default(),
            locale: None,
        }
    }
}

impl ListingState {
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.page = 1;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
        self.page = 1;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, size: usize) {
        self.page_size = size.max(1);
        self.page = 1;
    }

    pub fn set_selected_topics(&mut self, topics: Vec<String>) {
        self.selected_topics = topics;
        self.page = 1;
    }

    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
        self.page = 1;
    }

    pub fn set_locale(&mut self, locale: Option<String>) {
        self.locale = locale;
    }

    /// Back to defaults, keeping the locale.
    pub fn reset_filters(&mut self) {
        let locale = self.locale.take();
        *self = Self { locale, ..Self::default() };
    }
}
