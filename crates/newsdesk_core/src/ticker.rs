use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::types::Article;

/// Only rows at this importance make it into the ticker.
pub const BREAKING_IMPORTANCE: i64 = 5;
pub const DEFAULT_ROTATION_INTERVAL: Duration = Duration::from_secs(5);

/// The breaking subsequence, in input order.
pub fn breaking(articles: &[Article]) -> Vec<Article> {
    articles
        .iter()
        .filter(|a| a.importance() == BREAKING_IMPORTANCE)
        .cloned()
        .collect()
}

/// A wrapping cursor over the breaking articles of one data load.
#[derive(Debug, Clone, Default)]
pub struct Ticker {
    items: Vec<Article>,
    index: usize,
}

impl Ticker {
    pub fn new(articles: &[Article]) -> Self {
        Self {
            items: breaking(articles),
            index: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[Article] {
        &self.items
    }

    pub fn current(&self) -> Option<&Article> {
        self.items.get(self.index)
    }

    /// Moves to the next item, wrapping after the last one.
    pub fn advance(&mut self) -> Option<&Article> {
        if !self.items.is_empty() {
            self.index = (self.index + 1) % self.items.len();
        }
        self.current()
    }

    /// Positions the cursor from a rotation index, which is always taken
    /// modulo the current length.
    pub fn seek(&mut self, index: usize) -> Option<&Article> {
        if !self.items.is_empty() {
            self.index = index % self.items.len();
        }
        self.current()
    }
}

/// Timer driving a ticker's index.
///
/// The task publishes the index on a watch channel every `interval`. It is
/// aborted when the rotation is dropped or [`reset`](Self::reset) for a new
/// selection, so subscribers never observe an index into a stale list.
pub struct TickerRotation {
    handle: JoinHandle<()>,
    index: watch::Receiver<usize>,
    interval: Duration,
}

impl TickerRotation {
    pub fn spawn(len: usize, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(0);
        let handle = tokio::spawn(rotate(tx, len, interval));
        Self {
            handle,
            index: rx,
            interval,
        }
    }

    pub fn current(&self) -> usize {
        *self.index.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index.clone()
    }

    /// Restarts from index 0 for a selection of `len` items.
    pub fn reset(&mut self, len: usize) {
        *self = Self::spawn(len, self.interval);
    }
}

impl Drop for TickerRotation {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn rotate(tx: watch::Sender<usize>, len: usize, interval: Duration) {
    if len <= 1 {
        // Nothing to rotate; stay parked until aborted.
        std::future::pending::<()>().await;
        return;
    }
    let mut ticks = tokio::time::interval(interval);
    ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticks.tick().await;
    let mut index = 0;
    loop {
        ticks.tick().await;
        index = (index + 1) % len;
        if tx.send(index).is_err() {
            break;
        }
    }
}
