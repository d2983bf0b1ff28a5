use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use newsdesk_core::{
    breaking, export_csv, export_file_name, select, Article, FilterOptions, FilterSet,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::AppState;

/// Value a select box sends for "no restriction".
const ANY: &str = "all";

/// An article plus the labels a card shows.
#[derive(Debug, Serialize)]
pub struct ArticleView {
    #[serde(flatten)]
    pub article: Article,
    pub headline: String,
    pub source: String,
    pub tags: Vec<String>,
    pub time_ago: String,
    pub importance: i64,
}

impl ArticleView {
    pub fn new(article: &Article, now: DateTime<Utc>) -> Self {
        Self {
            headline: article.headline().to_string(),
            source: article.source_label(),
            tags: article.display_tags().into_iter().map(str::to_string).collect(),
            time_ago: article.time_ago(now),
            importance: article.importance(),
            article: article.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticlesResponse {
    pub articles: Vec<ArticleView>,
    pub shown: usize,
    pub total: usize,
    pub summary: String,
    pub last_updated: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TickerResponse {
    pub articles: Vec<ArticleView>,
    pub interval_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub committed: bool,
    pub summary: String,
    pub error: Option<String>,
}

pub struct ApiError(newsdesk_core::Error);

impl From<newsdesk_core::Error> for ApiError {
    fn from(e: newsdesk_core::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

/// Reads `region`, `tema` (repeatable) and `dulezitost` from a query string.
/// Empty values and `all` leave that field unrestricted.
pub fn filters_from_query(query: Option<&str>) -> FilterSet {
    let mut filters = FilterSet::new();
    let Some(query) = query else {
        return filters;
    };
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        if value.is_empty() || value == ANY {
            continue;
        }
        match key.as_ref() {
            "region" => filters.region = Some(value.into_owned()),
            "tema" => {
                filters.topics.insert(value.into_owned());
            }
            "dulezitost" => filters.importance = Some(value.into_owned()),
            _ => {}
        }
    }
    filters
}

fn views(articles: &[Article], now: DateTime<Utc>) -> Vec<ArticleView> {
    articles.iter().map(|a| ArticleView::new(a, now)).collect()
}

pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Json<ArticlesResponse> {
    let filters = filters_from_query(query.as_deref());
    let dashboard = state.dashboard.read().await;
    let visible = select(dashboard.articles(), &filters);
    let now = Utc::now();
    Json(ArticlesResponse {
        shown: visible.len(),
        total: dashboard.articles().len(),
        summary: newsdesk_core::labels::summary_line(visible.len(), dashboard.articles().len()),
        articles: views(&visible, now),
        last_updated: dashboard.last_updated(),
        error: dashboard.error().map(str::to_string),
    })
}

pub async fn ticker(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Json<TickerResponse> {
    let filters = filters_from_query(query.as_deref());
    let dashboard = state.dashboard.read().await;
    let selected = breaking(&select(dashboard.articles(), &filters));
    Json(TickerResponse {
        articles: views(&selected, Utc::now()),
        interval_secs: state.ticker_interval.as_secs(),
    })
}

pub async fn filter_options(State(state): State<Arc<AppState>>) -> Json<FilterOptions> {
    Json(state.dashboard.read().await.options())
}

pub async fn export(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse, ApiError> {
    let filters = filters_from_query(query.as_deref());
    let body = {
        let dashboard = state.dashboard.read().await;
        export_csv(&select(dashboard.articles(), &filters))?
    };
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Utc::now().date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> Json<RefreshResponse> {
    let committed = state.reload().await;
    let dashboard = state.dashboard.read().await;
    Json(RefreshResponse {
        committed,
        summary: dashboard.summary(),
        error: dashboard.error().map(str::to_string),
    })
}
