use std::sync::Arc;
use std::time::Duration;

use newsdesk_core::Dashboard;
use newsdesk_feed::ArticleSource;
use tokio::sync::RwLock;

pub struct AppState {
    pub dashboard: RwLock<Dashboard>,
    pub source: Arc<dyn ArticleSource>,
    pub ticker_interval: Duration,
}

impl AppState {
    pub fn new(source: Arc<dyn ArticleSource>, ticker_interval: Duration) -> Self {
        Self {
            dashboard: RwLock::new(Dashboard::new()),
            source,
            ticker_interval,
        }
    }

    pub async fn refresh(&self) -> bool {
        newsdesk_feed::refresh(&self.dashboard, self.source.as_ref()).await
    }

    /// Refresh on request: always goes back to the sheet.
    pub async fn reload(&self) -> bool {
        newsdesk_feed::reload(&self.dashboard, self.source.as_ref()).await
    }
}
