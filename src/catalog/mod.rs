// src/catalog/mod.rs
// =============================================================================
// This module knows what a catalog product looks like.
//
// Submodules:
// - item: the Item record and the per-page result type
// - extract: turns a product card in a page's HTML into an Item
//
// Nothing in here does I/O. Fetching pages is the crawl module's job; this
// module only reads HTML strings that have already been downloaded.
// =============================================================================

mod extract;
mod item;

pub use extract::Extractor;
pub use item::{Item, PageResult};
