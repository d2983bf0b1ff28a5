use std::time::Duration;

/// The published editors' sheet.
pub const DEFAULT_FEED_URL: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQ_l17m8vJHRh6tpFR6DsOa57riI_Os0P-jxG0kOsXfwe0GIVL6gmezhK8nM2ZOYzURii97ogE3mXM6/pub?gid=1296308681&single=true&output=csv";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedConfig {
    pub url: String,
    /// Upper bound on a single request, connect through body.
    pub timeout: Duration,
    /// How long a fetched body is served from memory before refetching.
    pub revalidate: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            revalidate: DEFAULT_REVALIDATE,
        }
    }
}

impl FeedConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_revalidate(mut self, revalidate: Duration) -> Self {
        self.revalidate = revalidate;
        self
    }
}
