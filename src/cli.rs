// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Subcommands:
// - crawl:  crawl the catalog and list the items found
// - stats:  crawl and print the price summary
// - images: crawl and save every product image
// - run:    everything above in one go, ending with "Done"
//
// The catalog flags (base URL, category, batch size, ...) are shared by
// every subcommand through the flattened CatalogArgs struct.
//
// Rust concepts:
// - Derive macros: Parser, Subcommand and Args generate the parsing code
// - #[command(flatten)]: reuse one group of flags in several subcommands
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{
    CrawlConfig, DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE, DEFAULT_OPTIONS, DEFAULT_PRODUCT_LINK,
    DEFAULT_TIMEOUT_SECS,
};
use crate::error::CrawlError;

#[derive(Parser, Debug)]
#[command(
    name = "catalog-crawler",
    version = "0.1.0",
    about = "Crawl a paginated product catalog, summarise prices and save item images",
    long_about = "catalog-crawler walks every page of a product catalog concurrently, extracts \
                  each product's name, prices and image, and reports the cheapest item, the most \
                  expensive item and the average price. It can also download all product images."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the catalog and list every item found
    ///
    /// Example: catalog-crawler crawl --batch-size 10
    Crawl {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Crawl the catalog and print the price summary
    Stats {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Crawl the catalog and save every product image
    ///
    /// Example: catalog-crawler images --dir ./images
    Images {
        #[command(flatten)]
        catalog: CatalogArgs,

        #[command(flatten)]
        images: ImageArgs,
    },

    /// Crawl, save images, then print the price summary
    Run {
        #[command(flatten)]
        catalog: CatalogArgs,

        #[command(flatten)]
        images: ImageArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CatalogArgs {
    /// Scheme and host of the catalog
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Path of the product category
    #[arg(long, default_value = DEFAULT_PRODUCT_LINK)]
    pub product_link: String,

    /// Query string added to every page URL
    #[arg(long, default_value = DEFAULT_OPTIONS)]
    pub options: String,

    /// How many pages (or images) to fetch at once
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Seconds one page or image may take before it counts as failed
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Also crawl the page numbered like the pager's last link
    ///
    /// Without this flag the crawl stops one index before it.
    #[arg(long)]
    pub include_last_page: bool,
}

impl CatalogArgs {
    // Validates the raw flags into a CrawlConfig
    pub fn to_config(&self) -> Result<CrawlConfig, CrawlError> {
        CrawlConfig::new(
            &self.base_url,
            &self.product_link,
            &self.options,
            self.batch_size,
            Duration::from_secs(self.timeout),
            !self.include_last_page,
        )
    }
}

#[derive(Args, Debug, Clone)]
pub struct ImageArgs {
    /// Directory the images are written to
    #[arg(long, default_value = "images")]
    pub dir: PathBuf,

    /// Only print where each image would go, don't download anything
    #[arg(long)]
    pub dry_run: bool,
}
