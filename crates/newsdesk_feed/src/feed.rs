use async_trait::async_trait;
use newsdesk_core::{Error, Result};
use url::Url;

use crate::config::FeedConfig;
use crate::logging::Logger;
use crate::source::ArticleSource;

/// The published sheet, fetched over HTTP as CSV.
#[derive(Debug, Clone)]
pub struct CsvFeed {
    client: reqwest::Client,
    url: Url,
    logger: Logger,
}

impl CsvFeed {
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let url = Url::parse(&config.url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!("unsupported scheme: {}", url)));
        }
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let host = url.host_str().unwrap_or("feed");
        let logger = Logger::new().with_prefix("📰").with_prefix(format!("[{}]", host));
        Ok(Self { client, url, logger })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl ArticleSource for CsvFeed {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<String> {
        self.logger.debug("fetching feed");
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            self.logger.warn(&format!("feed returned HTTP {}", status.as_u16()));
            return Err(Error::Fetch {
                status: status.as_u16(),
                url: self.url.to_string(),
            });
        }
        let body = response.text().await?;
        self.logger.info(&format!("fetched {} bytes", body.len()));
        Ok(body)
    }
}
