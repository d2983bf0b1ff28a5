use chrono::Utc;
use newsdesk_core::{rank, Article, Dashboard, Result};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::parser::parse_articles;
use crate::source::ArticleSource;

/// Fetch, parse and rank one snapshot of the sheet.
pub async fn load_articles<S: ArticleSource + ?Sized>(source: &S) -> Result<Vec<Article>> {
    let text = source.fetch().await?;
    let articles = parse_articles(&text)?;
    let duplicates = articles.iter().filter(|a| a.is_duplicate()).count();
    info!(
        source = %source.describe(),
        count = articles.len(),
        duplicates,
        "parsed feed"
    );
    Ok(rank(articles))
}

/// Reloads `dashboard` from `source` without holding the lock across the
/// fetch. Returns whether this load was committed; a load overtaken by a
/// newer refresh is dropped.
pub async fn refresh<S: ArticleSource + ?Sized>(dashboard: &RwLock<Dashboard>, source: &S) -> bool {
    let ticket = dashboard.write().await.begin_load();
    let result = load_articles(source).await;
    let committed = dashboard.write().await.commit(ticket, result, Utc::now());
    if !committed {
        debug!(source = %source.describe(), "refresh superseded by a newer one");
    }
    committed
}

/// A user-requested refresh: bypasses any revalidation cache in front of the
/// sheet, then loads like [`refresh`].
pub async fn reload<S: ArticleSource + ?Sized>(dashboard: &RwLock<Dashboard>, source: &S) -> bool {
    source.invalidate().await;
    refresh(dashboard, source).await
}
