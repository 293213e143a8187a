// src/crawl/fetch.rs
// =============================================================================
// This module is the crawler's only door to the network.
//
// PageFetcher is a small trait with two operations:
// - fetch_text: download a page as HTML text
// - fetch_bytes: download raw bytes (used for product images)
//
// HttpFetcher implements it with reqwest. Tests swap in an in-memory
// fetcher so they never touch the network.
//
// Rust concepts:
// - Traits: an interface the crawler depends on instead of a concrete type
// - async-trait: lets traits have async methods and be used as dyn objects
// - Send + Sync: the fetcher is shared between many concurrent tasks
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::CrawlError;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Downloads `url` and returns the body as text
    async fn fetch_text(&self, url: &str) -> Result<String, CrawlError>;

    /// Downloads `url` and returns the raw body
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CrawlError>;
}

// PageFetcher backed by a reqwest Client
//
// The client is created once and reused for every request (connection
// pooling). Each request has its own timeout.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(request_timeout: Duration) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| CrawlError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    // Sends a GET request and checks the status code
    async fn get(&self, url: &str) -> Result<reqwest::Response, CrawlError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(url, e))?;

        if !response.status().is_success() {
            return Err(CrawlError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, CrawlError> {
        let response = self.get(url).await?;
        response.text().await.map_err(|e| fetch_error(url, e))
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CrawlError> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(|e| fetch_error(url, e))?;
        Ok(bytes.to_vec())
    }
}

fn fetch_error(url: &str, error: reqwest::Error) -> CrawlError {
    let reason = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    };

    CrawlError::Fetch {
        url: url.to_string(),
        reason,
    }
}
