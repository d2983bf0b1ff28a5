use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::filter::{select, FilterOptions, FilterSet};
use crate::labels::summary_line;
use crate::ticker::Ticker;
use crate::types::Article;
use crate::Result;

/// Shown instead of the article list when the last load failed.
pub const LOAD_ERROR_MESSAGE: &str = "Nepodařilo se načíst články";

/// Handle for one load attempt, issued by [`Dashboard::begin_load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Everything a dashboard view shows, owned in one place.
///
/// Loads replace the article set wholesale. Concurrent loads resolve as last
/// request wins: only the ticket from the most recent `begin_load` can commit.
#[derive(Debug, Default)]
pub struct Dashboard {
    articles: Vec<Article>,
    filters: FilterSet,
    visible: Vec<Article>,
    last_updated: Option<DateTime<Utc>>,
    error: Option<String>,
    generation: u64,
    loading: bool,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket(self.generation)
    }

    /// Applies the outcome of a load. Returns false, leaving the state
    /// untouched, when a newer load has started since `ticket` was issued.
    ///
    /// `articles` are expected in ranked order. A failed load empties the
    /// article set and records the error message.
    pub fn commit(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Article>>,
        now: DateTime<Utc>,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!(ticket = ticket.0, current = self.generation, "discarding stale load");
            return false;
        }
        self.loading = false;
        match result {
            Ok(articles) => {
                info!(count = articles.len(), "loaded articles");
                self.articles = articles;
                self.error = None;
                self.last_updated = Some(now);
            }
            Err(e) => {
                warn!(error = %e, "article load failed");
                self.articles.clear();
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
        self.refilter();
        true
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.filters = filters;
        self.refilter();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.refilter();
    }

    fn refilter(&mut self) {
        self.visible = select(&self.articles, &self.filters);
    }

    /// Every loaded article, duplicates included, in ranked order.
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    /// The deduplicated, filtered view.
    pub fn visible(&self) -> &[Article] {
        &self.visible
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_articles(&self.articles)
    }

    pub fn ticker(&self) -> Ticker {
        Ticker::new(&self.visible)
    }

    pub fn summary(&self) -> String {
        summary_line(self.visible.len(), self.articles.len())
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
