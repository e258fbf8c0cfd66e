//! Quote store loader.
//!
//! Fetches the static quote resource once, from disk or over HTTP. Callers
//! that render views use [`QuoteSource::load_or_empty`], which never fails:
//! a missing or malformed resource is logged and yields an empty collection.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use quotes_core::QuoteCollection;

use crate::error::{Result, StoreError};

/// Upper bound on an HTTP fetch, connect through body.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the quote resource lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteSource {
    File(PathBuf),
    Url(String),
}

fn is_url(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl QuoteSource {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if is_url(s) {
            QuoteSource::Url(s.to_string())
        } else {
            QuoteSource::File(PathBuf::from(s))
        }
    }

    /// Relative file paths are taken relative to `base` (the config file's
    /// directory). URLs and absolute paths are returned unchanged.
    pub fn relative_to(self, base: &Path) -> Self {
        match self {
            QuoteSource::File(path) if path.is_relative() => QuoteSource::File(base.join(path)),
            other => other,
        }
    }

    /// Retrieve and parse the full collection.
    pub async fn fetch(&self) -> Result<QuoteCollection> {
        self.fetch_with_timeout(FETCH_TIMEOUT).await
    }

    /// As [`fetch`](Self::fetch), with a caller-chosen HTTP timeout.
    pub async fn fetch_with_timeout(&self, timeout: Duration) -> Result<QuoteCollection> {
        let body = match self {
            QuoteSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| StoreError::Io {
                        path: path.clone(),
                        source,
                    })?
            }
            QuoteSource::Url(url) => {
                let client = reqwest::Client::builder().timeout(timeout).build()?;
                let response = client.get(url.as_str()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(StoreError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response.text().await?
            }
        };
        let quotes = QuoteCollection::from_json(&body)?;

        for id in quotes.duplicate_ids() {
            tracing::warn!("quote id {id} appears more than once in {self}");
        }
        Ok(quotes)
    }

    /// Fetch, or log the failure and fall back to an empty collection.
    pub async fn load_or_empty(&self) -> QuoteCollection {
        match self.fetch().await {
            Ok(quotes) => {
                tracing::info!("loaded {} quotes from {self}", quotes.len());
                quotes
            }
            Err(e) => {
                tracing::error!("error fetching quotes from {self}: {e}");
                QuoteCollection::empty()
            }
        }
    }
}

impl fmt::Display for QuoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteSource::File(path) => write!(f, "{}", path.display()),
            QuoteSource::Url(url) => f.write_str(url),
        }
    }
}

impl FromStr for QuoteSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
