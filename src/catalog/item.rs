// src/catalog/item.rs
// =============================================================================
// The records produced by extraction.
//
// - Item: one product from the catalog (name, slug, image and three prices)
// - ItemFault: a product card that could not be turned into an Item
// - PageResult: everything extracted from one catalog page
//
// Rust concepts:
// - Derive macros: Serialize for JSON output, Clone so items can be handed
//   to concurrent save tasks
// - Result<T, E>: image_filename can fail, so it returns a Result
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::CrawlError;

// A dot followed by word characters at the very end of the URL
static EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\w+\z").unwrap());

// One product from the catalog
//
// Prices are whole numbers: every non-digit character is stripped from the
// price text before parsing, so "1 299 грн" becomes 1299.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    /// Product title, `None` when the card has no title text
    pub name: Option<String>,
    /// Slug taken from the product's detail link, e.g. "lego-123"
    pub filename: String,
    /// Absolute URL of the product image (or of the placeholder image)
    pub image_url: String,
    pub min_price: u64,
    pub mid_price: u64,
    pub max_price: u64,
}

impl Item {
    // Builds the file name the image is saved under
    //
    // Example:
    //   filename = "lego-123", image_url = "http://shop/img/a/42.jpg"
    //   -> "lego-123.jpg"
    pub fn image_filename(&self) -> Result<String, CrawlError> {
        let extension = EXTENSION
            .find(&self.image_url)
            .ok_or_else(|| CrawlError::ExtensionMatch {
                url: self.image_url.clone(),
            })?;

        Ok(format!("{}{}", self.filename, extension.as_str()))
    }

    // Name used in human-readable output
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

// A product card that was found on a page but could not be extracted
#[derive(Debug)]
pub struct ItemFault {
    /// Position of the card within the page, in document order
    pub position: usize,
    pub error: CrawlError,
}

// Everything extracted from one catalog page
//
// Items are in document order. Cards with a zero mid price are not in
// either list: they are skipped, not faults.
#[derive(Debug, Default)]
pub struct PageResult {
    pub index: usize,
    pub items: Vec<Item>,
    pub faults: Vec<ItemFault>,
}
