use anyhow::Result;
use axum::extract::{Path as UrlPath, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use blogdex_core::filters::{
    resolve_effective_source_filter, CategoryFilter, PostListCriteria, ReadingTimeRange,
    SourceFilter,
};
use blogdex_core::listing::{filter_and_sort_posts, paginate, SortOrder, DEFAULT_PAGE_SIZE};
use blogdex_core::{dates, related, Corpus, PostSummary, Source};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_PAGE_SIZE: usize = 50;
const MAX_SEARCH_RESULTS: usize = 100;

#[derive(Clone)]
pub struct AppState {
    corpora: Arc<HashMap<String, Corpus>>,
}

impl AppState {
    fn corpus(&self, locale: &str) -> Result<&Corpus, (StatusCode, Json<ErrorBody>)> {
        self.corpora.get(locale).ok_or_else(|| not_found("unknown locale"))
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

fn not_found(message: &str) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: message.to_string() }))
}

/// Load one corpus per locale from `data_dir` and wire up the routes. A
/// locale with no index file gets an empty corpus; requests for unlisted
/// locales are 404s.
pub fn build_app(data_dir: &Path, locales: &[String]) -> Result<Router> {
    let mut corpora = HashMap::new();
    for locale in locales {
        corpora.insert(locale.clone(), Corpus::load(data_dir, locale)?);
    }
    let state = AppState { corpora: Arc::new(corpora) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val.split(',').filter_map(|s| s.trim().parse().ok()).collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/:locale/search", get(search_handler))
        .route("/:locale/posts", get(list_handler))
        .route("/:locale/posts/:id/related", get(related_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);
    Ok(app)
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_k() -> usize {
    10
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub relevance: i64,
    pub source: Source,
    pub link: Option<String>,
}

pub async fn search_handler(
    State(state): State<AppState>,
    UrlPath(locale): UrlPath<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorBody>)> {
    let corpus = state.corpus(&locale)?;
    let k = params.k.clamp(1, MAX_SEARCH_RESULTS);
    let ranked = corpus.search(&params.q, Some(k));
    let results = ranked
        .into_iter()
        .map(|hit| SearchHit {
            id: hit.post.id,
            title: hit.post.title,
            relevance: hit.relevance,
            source: hit.post.source,
            link: hit.post.link,
        })
        .collect::<Vec<_>>();
    Ok(Json(SearchResponse { query: params.q, total_hits: results.len(), results }))
}

#[derive(Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub q: String,
    /// Comma-separated topic ids.
    #[serde(default)]
    pub topics: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub reading_time: String,
    /// `YYYY-MM-DD` bounds, inclusive at day granularity.
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub sort: String,
    /// Route context: `blog`, `medium`, `category`, or `topic`. Overrides the
    /// requested source filter for scoped pages.
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_page() -> usize {
    1
}

fn default_size() -> usize {
    DEFAULT_PAGE_SIZE
}

#[derive(Serialize)]
pub struct ListResponse {
    pub total: usize,
    pub page: usize,
    pub size: usize,
    pub results: Vec<PostSummary>,
}

pub async fn list_handler(
    State(state): State<AppState>,
    UrlPath(locale): UrlPath<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, (StatusCode, Json<ErrorBody>)> {
    let corpus = state.corpus(&locale)?;

    let scope = params.scope.trim().to_ascii_lowercase();
    let source_filter = resolve_effective_source_filter(
        scope == "blog",
        scope == "medium",
        scope == "category" || scope == "topic",
        SourceFilter::parse(&params.source),
    );
    let selected_topics: Vec<String> = params
        .topics
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    let criteria = PostListCriteria {
        query: params.q.clone(),
        selected_topics,
        category_filter: CategoryFilter::parse(&params.category),
        source_filter,
        start_date_ms: dates::parse_ms(&params.start),
        end_date_ms: dates::parse_ms(&params.end),
        reading_time: ReadingTimeRange::parse(&params.reading_time),
        scoped_ids: None,
    };

    let filtered = filter_and_sort_posts(corpus.posts(), &criteria, SortOrder::parse(&params.sort));
    let total = filtered.len();
    let page = params.page.max(1);
    let size = params.size.clamp(1, MAX_PAGE_SIZE);
    let results = paginate(&filtered, page, size).to_vec();
    Ok(Json(ListResponse { total, page, size, results }))
}

#[derive(Deserialize)]
pub struct RelatedParams {
    #[serde(default = "default_related_k")]
    pub k: usize,
}

fn default_related_k() -> usize {
    related::DEFAULT_LIMIT
}

#[derive(Serialize)]
pub struct RelatedResponse {
    pub post_id: String,
    pub results: Vec<PostSummary>,
}

pub async fn related_handler(
    State(state): State<AppState>,
    UrlPath((locale, post_id)): UrlPath<(String, String)>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<RelatedResponse>, (StatusCode, Json<ErrorBody>)> {
    let corpus = state.corpus(&locale)?;
    let post = corpus.find(&post_id).ok_or_else(|| not_found("unknown post"))?;
    let k = params.k.min(MAX_SEARCH_RESULTS);
    let results = related::related_posts(post, corpus.posts(), k);
    Ok(Json(RelatedResponse { post_id, results }))
}
