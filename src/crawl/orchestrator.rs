// src/crawl/orchestrator.rs
// =============================================================================
// CatalogCrawler: crawls the whole catalog once and answers questions
// about it.
//
// How a crawl works:
// 1. Fetch page 0 and read the pager to find the highest page index
// 2. Fetch pages 0..=highest in batches (BatchScheduler)
// 3. Extract the items of each page as soon as it arrives
// 4. Flatten the pages in index order into one Catalog
//
// Both the page count and the Catalog are computed at most once. If several
// callers ask at the same time, one of them does the work and the others
// wait for its result (tokio's OnceCell).
//
// Failure policy:
// - Page 0 failing during pager discovery fails the whole crawl
// - Any other page failure, and every broken product card, becomes a Fault
//   in the Catalog; items from healthy pages are still returned
// =============================================================================

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use super::batch::BatchScheduler;
use super::fetch::PageFetcher;
use super::pager;
use crate::analytics::{self, Summary};
use crate::catalog::{Extractor, Item, PageResult};
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::saver::ImageSaver;

// Every item of the catalog in crawl order, plus everything that went wrong
#[derive(Debug, Default)]
pub struct Catalog {
    pub items: Vec<Item>,
    pub faults: Vec<Fault>,
}

// A page that couldn't be fetched (position None) or a product card that
// couldn't be extracted (position Some)
#[derive(Debug)]
pub struct Fault {
    pub page: usize,
    pub position: Option<usize>,
    pub error: CrawlError,
}

#[derive(Debug, Default)]
pub struct SaveReport {
    pub saved: usize,
    pub failures: Vec<SaveFailure>,
}

#[derive(Debug)]
pub struct SaveFailure {
    /// Index of the item in Catalog::items
    pub item: usize,
    pub error: CrawlError,
}

pub struct CatalogCrawler {
    config: CrawlConfig,
    fetcher: Arc<dyn PageFetcher>,
    extractor: Arc<Extractor>,
    scheduler: BatchScheduler,
    highest_page: OnceCell<usize>,
    catalog: OnceCell<Catalog>,
}

impl CatalogCrawler {
    pub fn new(config: CrawlConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        let extractor = Arc::new(Extractor::new(config.base_url.clone()));
        let scheduler = BatchScheduler::new(config.batch_size, config.unit_timeout);

        Self {
            config,
            fetcher,
            extractor,
            scheduler,
            highest_page: OnceCell::new(),
            catalog: OnceCell::new(),
        }
    }

    // Highest zero-based page index to crawl, read from page 0's pager
    pub async fn page_count(&self) -> Result<usize, CrawlError> {
        let highest = self
            .highest_page
            .get_or_try_init(|| async {
                let html = self.fetcher.fetch_text(&self.config.page_url(0)).await?;
                let last_visible = pager::last_visible_page(&html);
                let highest =
                    pager::highest_page_index(last_visible, self.config.exclude_last_page)?;

                info!(?last_visible, highest, "discovered catalog pages");
                Ok::<_, CrawlError>(highest)
            })
            .await?;

        Ok(*highest)
    }

    // Crawls the catalog on first call; later calls return the same Catalog
    pub async fn start(&self) -> Result<&Catalog, CrawlError> {
        self.catalog.get_or_try_init(|| self.crawl()).await
    }

    async fn crawl(&self) -> Result<Catalog, CrawlError> {
        let highest = self.page_count().await?;

        let pages = self
            .scheduler
            .run(highest + 1, |index| {
                let fetcher = Arc::clone(&self.fetcher);
                let extractor = Arc::clone(&self.extractor);
                let url = self.config.page_url(index);

                async move {
                    let html = fetcher.fetch_text(&url).await?;
                    let page = extractor.extract_page(index, &html);
                    info!("finish with {}", index);
                    Ok::<_, CrawlError>(page)
                }
            })
            .await;

        let catalog = flatten_pages(pages);
        info!(
            items = catalog.items.len(),
            faults = catalog.faults.len(),
            "crawl complete"
        );
        Ok(catalog)
    }

    // Runs the saver over every item, in batches like the page crawl
    //
    // A failing save is recorded in the report and doesn't stop the others.
    pub async fn save_images(&self, saver: Arc<dyn ImageSaver>) -> Result<SaveReport, CrawlError> {
        let items = &self.start().await?.items;

        let outcomes = self
            .scheduler
            .run(items.len(), |index| {
                let saver = Arc::clone(&saver);
                let item = items[index].clone();
                async move { saver.save(&item).await }
            })
            .await;

        let mut report = SaveReport::default();
        for (item, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(_) => report.saved += 1,
                Err(error) => {
                    warn!(item, "image not saved: {}", error);
                    report.failures.push(SaveFailure { item, error });
                }
            }
        }

        Ok(report)
    }

    pub async fn cheapest(&self) -> Result<&Item, CrawlError> {
        analytics::cheapest(&self.start().await?.items)
    }

    pub async fn most_expensive(&self) -> Result<&Item, CrawlError> {
        analytics::most_expensive(&self.start().await?.items)
    }

    pub async fn overall_mid_price(&self) -> Result<f64, CrawlError> {
        analytics::overall_mid_price(&self.start().await?.items)
    }

    pub async fn summary(&self) -> Result<Summary, CrawlError> {
        analytics::summarize(&self.start().await?.items)
    }
}

// Joins per-page results into one Catalog, keeping page index order
fn flatten_pages(pages: Vec<Result<PageResult, CrawlError>>) -> Catalog {
    let mut catalog = Catalog::default();

    for (index, page) in pages.into_iter().enumerate() {
        match page {
            Ok(page) => {
                debug_assert_eq!(page.index, index);
                catalog.items.extend(page.items);
                for fault in page.faults {
                    warn!(page = page.index, position = fault.position, "skipping product: {}", fault.error);
                    catalog.faults.push(Fault {
                        page: page.index,
                        position: Some(fault.position),
                        error: fault.error,
                    });
                }
            }
            Err(error) => {
                warn!(page = index, "page failed: {}", error);
                catalog.faults.push(Fault {
                    page: index,
                    position: None,
                    error,
                });
            }
        }
    }

    catalog
}
