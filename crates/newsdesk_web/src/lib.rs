use axum::{
    routing::{get, post},
    Router,
};
use newsdesk_core::ticker::DEFAULT_ROTATION_INTERVAL;
use newsdesk_feed::ArticleSource;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    /// Advertised to clients so they rotate the ticker at the same pace
    pub ticker_interval: Duration,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            ticker_interval: DEFAULT_ROTATION_INTERVAL,
        }
    }
}

pub async fn create_app(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/articles", get(handlers::list_articles))
        .route("/api/ticker", get(handlers::ticker))
        .route("/api/filters", get(handlers::filter_options))
        .route("/api/export", get(handlers::export))
        .route("/api/refresh", post(handlers::refresh))
        .layer(cors)
        .with_state(state)
}

/// Loads the feed once, then serves the dashboard API until the listener
/// fails. A failed initial load is served as the dashboard's error state.
pub async fn serve(
    config: ServeConfig,
    source: Arc<dyn ArticleSource>,
) -> newsdesk_core::Result<()> {
    let state = Arc::new(AppState::new(source, config.ticker_interval));
    state.refresh().await;

    let app = create_app(state).await;
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("🌐 Dashboard API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

pub mod prelude {
    pub use crate::{AppState, ServeConfig};
    pub use newsdesk_core::{Article, Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use newsdesk_feed::Revalidating;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct StaticSheet(Option<&'static str>);

    #[async_trait]
    impl ArticleSource for StaticSheet {
        fn describe(&self) -> String {
            "static".to_string()
        }

        async fn fetch(&self) -> newsdesk_core::Result<String> {
            match self.0 {
                Some(body) => Ok(body.to_string()),
                None => Err(newsdesk_core::Error::Fetch { status: 404, url: "static".to_string() }),
            }
        }
    }

    const SHEET: &str = "id_hash,dulezitost,timestamp,tema,region,doporuceny_nadpis\n\
        1,5,2024-01-02T00:00:00Z,Politika,CZ,Rozpočet\n\
        2,3,2024-01-03T00:00:00Z,Duplicitni,CZ,\n\
        3,5,2024-01-01T00:00:00Z,Sport,SK,Finále\n\
        4,2,2024-01-05T00:00:00Z,Sport,CZ,Okresní přebor\n";

    async fn app_with(sheet: Option<&'static str>) -> Router {
        let state = Arc::new(AppState::new(Arc::new(StaticSheet(sheet)), Duration::from_secs(5)));
        state.refresh().await;
        create_app(state).await
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn ids(value: &Value) -> Vec<&str> {
        value["articles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id_hash"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_default_config_matches_bind() {
        let config = ServeConfig::default();
        assert_eq!(config.bind, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.ticker_interval, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_list_articles() {
        let (status, body) = get_json(app_with(Some(SHEET)).await, "/api/articles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec!["1", "3", "4"]);
        assert_eq!(body["summary"], "3 z 4 článků");
        assert_eq!(body["articles"][0]["headline"], "Rozpočet");
        assert!(body["error"].is_null());
    }

    #[tokio::test]
    async fn test_list_articles_with_filters() {
        let app = app_with(Some(SHEET)).await;
        let (_, body) = get_json(app, "/api/articles?region=CZ&tema=Sport&tema=Politika").await;
        assert_eq!(ids(&body), vec!["1", "4"]);
        assert_eq!(body["shown"], 2);
        assert_eq!(body["total"], 4);
    }

    #[tokio::test]
    async fn test_ticker_and_options() {
        let app = app_with(Some(SHEET)).await;
        let (_, body) = get_json(app.clone(), "/api/ticker").await;
        assert_eq!(ids(&body), vec!["1", "3"]);
        assert_eq!(body["interval_secs"], 5);

        let (_, options) = get_json(app, "/api/filters").await;
        assert_eq!(options["regions"], serde_json::json!(["CZ", "SK"]));
        assert_eq!(options["topics"], serde_json::json!(["Politika", "Sport"]));
    }

    #[tokio::test]
    async fn test_export_download() {
        let app = app_with(Some(SHEET)).await;
        let response = app
            .oneshot(Request::builder().uri("/api/export?region=SK").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"clanky_"));
        assert!(disposition.ends_with(".csv\""));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("\"Finále\",\"\",\"SK\",\"Sport\",\"5\""));
    }

    #[tokio::test]
    async fn test_failed_load_reports_error_state() {
        let (status, body) = get_json(app_with(None).await, "/api/articles").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], newsdesk_core::LOAD_ERROR_MESSAGE);
        assert!(body["articles"].as_array().unwrap().is_empty());
    }

    /// A sheet that gains a breaking row on every fetch.
    struct GrowingSheet(AtomicUsize);

    #[async_trait]
    impl ArticleSource for GrowingSheet {
        fn describe(&self) -> String {
            "growing".to_string()
        }

        async fn fetch(&self) -> newsdesk_core::Result<String> {
            let n = self.0.fetch_add(1, Ordering::SeqCst) + 1;
            let rows: String = (1..=n).map(|i| format!("{},5\n", i)).collect();
            Ok(format!("id_hash,dulezitost\n{}", rows))
        }
    }

    #[tokio::test]
    async fn test_refresh_endpoint_refetches_cached_sheet() {
        let source = Revalidating::new(GrowingSheet(AtomicUsize::new(0)), Duration::from_secs(300));
        let state = Arc::new(AppState::new(Arc::new(source), Duration::from_secs(5)));
        state.refresh().await;
        let app = create_app(state).await;

        let (_, before) = get_json(app.clone(), "/api/articles").await;
        assert_eq!(before["total"], 1);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let (_, after) = get_json(app, "/api/articles").await;
        assert_eq!(after["total"], 2);
        assert_eq!(after["summary"], "2 z 2 článků");
    }

    #[tokio::test]
    async fn test_refresh_endpoint() {
        let app = app_with(Some(SHEET)).await;
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["committed"], true);
        assert_eq!(body["summary"], "3 z 4 článků");
    }
}
