use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::feed::parser::FeedParser;
use crate::feed::{Entry, FeedSource, ParsedFeed};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: Client,
    timeout_duration: Duration,
    user_agent: String,
}

impl FeedFetcher {
    /// Build a fetcher from an explicit transport description. Proxy settings
    /// from the environment are ignored unless `use_proxy` is set.
    pub fn new(transport: &TransportConfig) -> Result<Self> {
        let timeout_duration = Duration::from_secs(transport.timeout);

        let mut builder = Client::builder()
            .timeout(timeout_duration)
            .redirect(reqwest::redirect::Policy::limited(10))
            .gzip(true);
        if !transport.use_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| Error::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_duration,
            user_agent: transport.user_agent.clone(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_duration = timeout;
        self
    }

    pub async fn fetch_feed(&self, url: &str) -> Result<ParsedFeed> {
        debug!("Fetching feed from: {}", url);

        let parser = FeedParser::new();
        parser.validate_feed_url(url)?;

        let response = timeout(self.timeout_duration, self.fetch_response(url))
            .await
            .map_err(|_| Error::Timeout(format!("Request to {} timed out", url)))??;

        if !response.status().is_success() {
            return Err(Error::HttpError(format!(
                "HTTP {} for {}: {}",
                response.status().as_u16(),
                url,
                response.status().canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let content = response
            .bytes()
            .await
            .map_err(|e| Error::HttpError(format!("Failed to read response body: {}", e)))?;

        debug!("Downloaded {} bytes from {}", content.len(), url);

        parser.parse_feed(std::io::Cursor::new(content))
    }

    async fn fetch_response(&self, url: &str) -> Result<Response> {
        self.client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/rss+xml, application/atom+xml, application/xml, text/xml, */*")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("Request to {} timed out", url))
                } else {
                    Error::HttpError(format!("Request failed: {}", e))
                }
            })
    }
}

#[async_trait]
impl FeedSource for FeedFetcher {
    async fn fetch_entries(&self, url: &str) -> Result<Vec<Entry>> {
        let feed = self.fetch_feed(url).await?;
        debug!("Feed '{}' has {} entries", feed.title, feed.entries.len());
        Ok(feed.entries)
    }
}
