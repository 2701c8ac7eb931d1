//! Composable boolean predicates over a post and one filter criterion, plus
//! the combinator that ANDs them for the post-list surfaces. All predicates
//! are pure; unrecognized filter values match nothing rather than erroring.

use std::collections::HashSet;

use crate::dates;
use crate::post::{PostSummary, Source};
use crate::search::{self, ParsedQuery};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceFilter {
    #[default]
    All,
    Blog,
    Medium,
    /// Anything we did not recognize. Kept distinct so it is never silently
    /// coerced to a real source; it simply matches no post.
    Unknown,
}

impl SourceFilter {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => SourceFilter::All,
            "blog" => SourceFilter::Blog,
            "medium" => SourceFilter::Medium,
            _ => SourceFilter::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Category id, stored lowercased for case-insensitive comparison.
    Id(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim().to_lowercase();
        if value.is_empty() || value == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Id(value)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadingTimeRange {
    #[default]
    Any,
    Min3Max7,
    Min8Max12,
    Min15Plus,
    Unknown,
}

impl ReadingTimeRange {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "any" => ReadingTimeRange::Any,
            "3-7" => ReadingTimeRange::Min3Max7,
            "8-12" => ReadingTimeRange::Min8Max12,
            "15+" => ReadingTimeRange::Min15Plus,
            _ => ReadingTimeRange::Unknown,
        }
    }
}

/// True when the query normalizes to nothing (no filter) or the post's
/// relevance score for it is positive.
pub fn matches_search_query(post: &PostSummary, query: &str) -> bool {
    match ParsedQuery::parse(query) {
        ParsedQuery::Empty => true,
        ParsedQuery::TooShort => false,
        ParsedQuery::Terms(terms) => search::relevance_for_terms(post, &terms) > 0,
    }
}

/// True when no topics are selected, or the post carries at least one of the
/// selected topic ids.
pub fn matches_selected_topics(post: &PostSummary, topic_ids: &[String]) -> bool {
    if topic_ids.is_empty() {
        return true;
    }
    post.topics
        .iter()
        .any(|topic| !topic.id.is_empty() && topic_ids.iter().any(|id| id == &topic.id))
}

pub fn matches_category_filter(post: &PostSummary, filter: &CategoryFilter) -> bool {
    match filter {
        CategoryFilter::All => true,
        CategoryFilter::Id(id) => post
            .category
            .as_ref()
            .is_some_and(|category| category.id.to_lowercase() == *id),
    }
}

pub fn matches_source_filter(post: &PostSummary, filter: &SourceFilter) -> bool {
    match filter {
        SourceFilter::All => true,
        SourceFilter::Blog => post.source == Source::Blog,
        SourceFilter::Medium => post.source == Source::Medium,
        SourceFilter::Unknown => false,
    }
}

/// Inclusive published-date range check at day granularity: the start bound
/// floors to 00:00:00.000 and the end bound ceils to 23:59:59.999 of its UTC
/// day. A `None` bound is unbounded on that side.
pub fn matches_published_date_range(post: &PostSummary, start_ms: Option<i64>, end_ms: Option<i64>) -> bool {
    if let Some(start) = start_ms {
        if post.published_ms < dates::day_floor_ms(start) {
            return false;
        }
    }
    if let Some(end) = end_ms {
        if post.published_ms > dates::day_ceil_ms(end) {
            return false;
        }
    }
    true
}

/// Reading-time band check. Non-finite or non-positive minutes fail every
/// band except `Any`; an unrecognized band matches nothing.
pub fn matches_reading_time_range(minutes: f64, range: ReadingTimeRange) -> bool {
    if range == ReadingTimeRange::Any {
        return true;
    }
    if !minutes.is_finite() || minutes <= 0.0 {
        return false;
    }
    match range {
        ReadingTimeRange::Any => true,
        ReadingTimeRange::Min3Max7 => (3.0..=7.0).contains(&minutes),
        ReadingTimeRange::Min8Max12 => (8.0..=12.0).contains(&minutes),
        ReadingTimeRange::Min15Plus => minutes >= 15.0,
        ReadingTimeRange::Unknown => false,
    }
}

/// Everything a post-list surface filters by, resolved from UI state before
/// the corpus is walked. `source_filter` is the effective filter, i.e. after
/// the route-context override.
#[derive(Debug, Clone, Default)]
pub struct PostListCriteria {
    pub query: String,
    pub selected_topics: Vec<String>,
    pub category_filter: CategoryFilter,
    pub source_filter: SourceFilter,
    pub start_date_ms: Option<i64>,
    pub end_date_ms: Option<i64>,
    pub reading_time: ReadingTimeRange,
    /// When present, only posts whose id is in the set survive. Used by
    /// topic/category pages that pre-scope the corpus.
    pub scoped_ids: Option<HashSet<String>>,
}

/// AND of all applicable predicates. Cheap checks run before the fuzzy
/// relevance match; order cannot change the boolean result.
pub fn matches_post_list_filters(post: &PostSummary, criteria: &PostListCriteria) -> bool {
    if let Some(scoped) = &criteria.scoped_ids {
        if !scoped.contains(&post.id) {
            return false;
        }
    }
    matches_source_filter(post, &criteria.source_filter)
        && matches_category_filter(post, &criteria.category_filter)
        && matches_selected_topics(post, &criteria.selected_topics)
        && matches_reading_time_range(post.reading_time_min as f64, criteria.reading_time)
        && matches_published_date_range(post, criteria.start_date_ms, criteria.end_date_ms)
        && matches_search_query(post, &criteria.query)
}

/// Route-context override for the source filter. Pages scoped to the blog or
/// to Medium force their implied source; category and topic pages scope by
/// other means, so they force `All` to avoid double-filtering. Only an
/// unscoped page respects the user's requested filter.
pub fn resolve_effective_source_filter(
    is_blog_route: bool,
    is_medium_route: bool,
    is_category_or_topic_route: bool,
    requested: SourceFilter,
) -> SourceFilter {
    if is_blog_route {
        SourceFilter::Blog
    } else if is_medium_route {
        SourceFilter::Medium
    } else if is_category_or_topic_route {
        SourceFilter::All
    } else {
        requested
    }
}
