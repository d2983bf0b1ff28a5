use std::time::Duration;

use async_trait::async_trait;
use newsdesk_core::Result;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Human-readable origin, used in logs
    fn describe(&self) -> String;

    /// Fetches the raw CSV body
    async fn fetch(&self) -> Result<String>;

    /// Drops anything held from earlier fetches so the next one goes
    /// upstream. Uncached sources have nothing to drop.
    async fn invalidate(&self) {}
}

/// Serves a source's last body from memory while it is younger than the
/// revalidation window. Failed fetches are never cached.
pub struct Revalidating<S> {
    inner: S,
    window: Duration,
    cached: Mutex<Option<(Instant, String)>>,
}

impl<S: ArticleSource> Revalidating<S> {
    pub fn new(inner: S, window: Duration) -> Self {
        Self {
            inner,
            window,
            cached: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ArticleSource> ArticleSource for Revalidating<S> {
    fn describe(&self) -> String {
        self.inner.describe()
    }

    async fn invalidate(&self) {
        self.cached.lock().await.take();
        self.inner.invalidate().await;
    }

    async fn fetch(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some((fetched_at, body)) = cached.as_ref() {
            if fetched_at.elapsed() < self.window {
                tracing::debug!(source = %self.inner.describe(), "serving cached feed body");
                return Ok(body.clone());
            }
        }
        let body = self.inner.fetch().await?;
        *cached = Some((Instant::now(), body.clone()));
        Ok(body)
    }
}
