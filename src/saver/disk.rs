// src/saver/disk.rs
// =============================================================================
// The saver that actually downloads images.
//
// For each item:
// 1. Work out the file name (slug + the image's extension)
// 2. Download the image bytes through the shared PageFetcher
// 3. Write them to <directory>/<file name>, creating the directory if needed
//
// Each failure is scoped to one item: ImageFetch for the download,
// Write for the filesystem. The crawler records it and keeps going.
// =============================================================================

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::ImageSaver;
use crate::catalog::Item;
use crate::crawl::PageFetcher;
use crate::error::CrawlError;

pub struct DiskSaver {
    directory: PathBuf,
    fetcher: Arc<dyn PageFetcher>,
}

impl DiskSaver {
    pub fn new(directory: impl Into<PathBuf>, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            directory: directory.into(),
            fetcher,
        }
    }
}

#[async_trait]
impl ImageSaver for DiskSaver {
    async fn save(&self, item: &Item) -> Result<PathBuf, CrawlError> {
        let path = self.directory.join(item.image_filename()?);

        let bytes = self
            .fetcher
            .fetch_bytes(&item.image_url)
            .await
            .map_err(|e| CrawlError::ImageFetch {
                url: item.image_url.clone(),
                reason: e.to_string(),
            })?;

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| CrawlError::Write {
                path: self.directory.clone(),
                source,
            })?;

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| CrawlError::Write {
                path: path.clone(),
                source,
            })?;

        info!("{}", item.image_url);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedFetcher;

    fn item(image_url: &str) -> Item {
        Item {
            name: Some("Duplo".to_string()),
            filename: "duplo-10".to_string(),
            image_url: image_url.to_string(),
            min_price: 10,
            mid_price: 10,
            max_price: 10,
        }
    }

    #[tokio::test]
    async fn test_writes_image_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("images");
        let fetcher = ScriptedFetcher::new().with_bytes("http://shop.test/img/10.png", b"PNGDATA");
        let saver = DiskSaver::new(&target, Arc::new(fetcher));

        let path = saver.save(&item("http://shop.test/img/10.png")).await.unwrap();

        assert_eq!(path, target.join("duplo-10.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"PNGDATA");
    }

    #[tokio::test]
    async fn test_download_failure_is_image_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let saver = DiskSaver::new(dir.path(), Arc::new(ScriptedFetcher::new()));

        let result = saver.save(&item("http://shop.test/img/missing.png")).await;

        assert!(matches!(result, Err(CrawlError::ImageFetch { .. })));
        assert!(!dir.path().join("duplo-10.png").exists());
    }

    #[tokio::test]
    async fn test_unwritable_target_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("images");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let fetcher = ScriptedFetcher::new().with_bytes("http://shop.test/img/10.png", b"PNGDATA");
        let saver = DiskSaver::new(&blocker, Arc::new(fetcher));

        let result = saver.save(&item("http://shop.test/img/10.png")).await;
        assert!(matches!(result, Err(CrawlError::Write { .. })));
    }
}
