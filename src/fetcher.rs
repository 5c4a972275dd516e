use std::time::Duration;

use feed_rs::model::FeedType;
use feed_rs::parser::{self, ParseFeedError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

/// Maximum number of headlines kept per source.
pub const HEADLINES_PER_SOURCE: usize = 6;

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const FEED_ACCEPT: &str = "application/rss+xml, application/xml, text/xml, */*";

const MISSING_TITLE: &str = "No title";
const MISSING_LINK: &str = "#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(StatusCode),
    #[error("unparsable feed: {0}")]
    Parse(#[from] ParseFeedError),
    #[error("not an RSS feed: {0:?}")]
    NotRss(FeedType),
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(FEED_ACCEPT));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch up to `max_items` headlines. Any failure yields an empty list.
    pub async fn fetch(&self, url: &str, max_items: usize) -> Vec<Headline> {
        match self.try_fetch(url, max_items).await {
            Ok(headlines) => {
                debug!("Fetched {} headlines from {}", headlines.len(), url);
                headlines
            }
            Err(e) => {
                warn!("Feed unavailable ({}): {}", url, e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch(&self, url: &str, max_items: usize) -> Result<Vec<Headline>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let bytes = response.bytes().await?;
        Self::parse_headlines(&bytes, max_items)
    }

    /// Extract the first `max_items` `item` headlines of an RSS document, in
    /// document order. Atom and JSON feeds carry no `item` elements and are
    /// rejected.
    pub fn parse_headlines(bytes: &[u8], max_items: usize) -> Result<Vec<Headline>, FetchError> {
        let parsed = parser::parse(bytes)?;

        match parsed.feed_type {
            FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2 => {}
            other => return Err(FetchError::NotRss(other)),
        }

        let headlines = parsed
            .entries
            .into_iter()
            .take(max_items)
            .map(|entry| {
                let title = entry
                    .title
                    .map(|t| t.content.trim().to_string())
                    .unwrap_or_else(|| MISSING_TITLE.to_string());

                let link = entry
                    .links
                    .first()
                    .map(|l| l.href.trim().to_string())
                    .unwrap_or_else(|| MISSING_LINK.to_string());

                Headline { title, link }
            })
            .collect();

        Ok(headlines)
    }
}
