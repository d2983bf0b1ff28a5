use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Fetch error: {url} returned HTTP {status}")]
    Fetch { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Malformed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True for failures to obtain the feed body: a non-success status or a
    /// transport error (including timeouts).
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Fetch { .. } | Error::Http(_))
    }

    /// True when the body was obtained but is not readable CSV.
    pub fn is_parse(&self) -> bool {
        matches!(self, Error::Parse(_) | Error::Malformed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
