// src/error.rs
// =============================================================================
// The error type shared by every part of the crawler.
//
// Each variant is one kind of failure the crawl can run into:
// - fetching pages or images over the network
// - a product card missing something we cannot do without
// - analytics asked about an empty catalog
// - a unit of concurrent work that timed out or panicked
//
// main.rs still uses anyhow at the very top; everything below it returns
// Result<T, CrawlError> so callers can match on what went wrong.
//
// Rust concepts:
// - thiserror: derives std::error::Error and Display from attributes
// - Enums with named fields: each variant carries its own context
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    /// Network or HTTP failure while fetching a catalog page
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A required element (the detail link) is missing or unusable
    #[error("product card has no usable {element}")]
    StructuralParse { element: &'static str },

    /// The pager claims more pages than the crawler is willing to fetch
    #[error("pager reports {shown} pages, more than the limit of {limit}")]
    PageCount { shown: u64, limit: usize },

    /// A non-empty price range that isn't `<low> - <high> <unit>`
    #[error("price range `{text}` is not of the form `<low> - <high> <unit>`")]
    RangeFormat { text: String },

    /// The image URL has no `.ext` suffix to build a file name from
    #[error("image url `{url}` has no file extension")]
    ExtensionMatch { url: String },

    #[error("the catalog has no items")]
    EmptyCollection,

    #[error("failed to fetch image {url}: {reason}")]
    ImageFetch { url: String, reason: String },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A scheduled unit ran past its time budget
    #[error("unit {index} did not finish within {timeout:?}")]
    UnitTimeout { index: usize, timeout: Duration },

    #[error("unit {index} panicked: {reason}")]
    UnitPanicked { index: usize, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),
}
