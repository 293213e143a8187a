// src/config.rs
// =============================================================================
// Crawl settings in their validated, typed form.
//
// cli.rs collects raw strings and numbers from the command line; this module
// checks them (base URL must be http/https, batch size at least 1) and turns
// them into a CrawlConfig the rest of the crawler can trust.
//
// The defaults reproduce the catalog this tool was first written for.
// =============================================================================

use std::time::Duration;
use url::Url;

use crate::error::CrawlError;

pub const DEFAULT_BASE_URL: &str = "http://hotline.ua";
pub const DEFAULT_PRODUCT_LINK: &str = "/deti/detskie-konstruktory/";
pub const DEFAULT_OPTIONS: &str = "?catmode=tiles&sort=1&sr=0";
pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Scheme and host of the catalog, also used to resolve image paths
    pub base_url: Url,
    /// Path of the product category, e.g. "/deti/detskie-konstruktory/"
    pub product_link: String,
    /// Query string appended to every page URL (starts with '?')
    pub options: String,
    /// How many pages (or images) are processed concurrently per batch
    pub batch_size: usize,
    /// Time budget for one unit of work (one page, one image)
    pub unit_timeout: Duration,
    /// Crawl up to the pager's last number minus one (see pager.rs)
    pub exclude_last_page: bool,
}

impl CrawlConfig {
    // Builds a config from raw values, validating each one
    pub fn new(
        base_url: &str,
        product_link: &str,
        options: &str,
        batch_size: usize,
        unit_timeout: Duration,
        exclude_last_page: bool,
    ) -> Result<Self, CrawlError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| CrawlError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;

        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(CrawlError::Config(format!(
                "base URL must be http or https: {}",
                base_url
            )));
        }

        if batch_size == 0 {
            return Err(CrawlError::Config("batch size must be at least 1".to_string()));
        }

        Ok(Self {
            base_url,
            product_link: product_link.to_string(),
            options: options.to_string(),
            batch_size,
            unit_timeout,
            exclude_last_page,
        })
    }

    // URL of one catalog page
    //
    // Example (defaults, index 2):
    //   http://hotline.ua/deti/detskie-konstruktory/?catmode=tiles&sort=1&sr=0&p=2
    pub fn page_url(&self, index: usize) -> String {
        let separator = if self.options.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}{}p={}",
            self.base_url.as_str().trim_end_matches('/'),
            self.product_link,
            self.options,
            separator,
            index
        )
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            product_link: DEFAULT_PRODUCT_LINK.to_string(),
            options: DEFAULT_OPTIONS.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            unit_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            exclude_last_page: true,
        }
    }
}
