pub mod config;
pub mod feed;
pub mod loader;
pub mod logging;
pub mod parser;
pub mod source;

pub use config::FeedConfig;
pub use feed::CsvFeed;
pub use loader::{load_articles, refresh, reload};
pub use parser::{parse_articles, parse_reader};
pub use source::{ArticleSource, Revalidating};

/// The sheet feed with the configured revalidation window in front of it.
pub fn published_feed(config: &FeedConfig) -> newsdesk_core::Result<Revalidating<CsvFeed>> {
    Ok(Revalidating::new(CsvFeed::new(config)?, config.revalidate))
}

pub mod prelude {
    pub use super::source::ArticleSource;
    pub use newsdesk_core::{Article, Error, Result};
}
