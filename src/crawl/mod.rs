// src/crawl/mod.rs
// =============================================================================
// This module handles crawling the catalog.
//
// Submodules:
// - fetch: the PageFetcher trait and its reqwest implementation
// - pager: reads the number of pages from the first page
// - batch: runs indexed work in fixed-size concurrent batches
// - orchestrator: ties them together into CatalogCrawler
//
// Pages are fetched concurrently, but the items always come back ordered
// by page index and then by their position on the page.
// =============================================================================

mod batch;
mod fetch;
mod orchestrator;
mod pager;

pub use fetch::{HttpFetcher, PageFetcher};
pub use orchestrator::{Catalog, CatalogCrawler, Fault, SaveFailure, SaveReport};
