// src/saver/mod.rs
// =============================================================================
// What to do with each product's image.
//
// Two savers implement the same ImageSaver trait:
// - LogSaver: only reports where the image would be written (a dry run)
// - DiskSaver: downloads the image and writes it into a directory
//
// The crawler takes an Arc<dyn ImageSaver>, so the choice is made once when
// the command line is parsed and the crawl code doesn't care which one it got.
//
// Rust concepts:
// - Trait objects (dyn ImageSaver): one interface, several implementations
// - async-trait: async fn in a trait that is used behind a pointer
// =============================================================================

mod disk;
mod log;

use async_trait::async_trait;
use std::path::PathBuf;

use crate::catalog::Item;
use crate::error::CrawlError;

pub use disk::DiskSaver;
pub use log::LogSaver;

#[async_trait]
pub trait ImageSaver: Send + Sync {
    /// Disposes of one item's image, returning its destination path
    async fn save(&self, item: &Item) -> Result<PathBuf, CrawlError>;
}
