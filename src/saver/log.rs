// src/saver/log.rs
// =============================================================================
// The dry-run saver: prints the destination path and touches nothing.
// =============================================================================

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use super::ImageSaver;
use crate::catalog::Item;
use crate::error::CrawlError;

#[derive(Debug, Clone)]
pub struct LogSaver {
    directory: PathBuf,
}

impl LogSaver {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

#[async_trait]
impl ImageSaver for LogSaver {
    async fn save(&self, item: &Item) -> Result<PathBuf, CrawlError> {
        let path = self.directory.join(item.image_filename()?);
        info!("{}", path.display());
        Ok(path)
    }
}
