// src/catalog/extract.rs
// =============================================================================
// This module turns catalog HTML into Item records.
//
// A catalog page is a list of product cards. For each card we read:
// - the title link (name, and the slug from its href)
// - the mid price ("300 грн") and an optional range ("123 - 456 грн")
// - the image source, resolved against the catalog's base URL
//
// Cards whose mid price is missing or zero are skipped. Cards that have a
// price but are missing the detail link, or have a malformed range, become
// ItemFaults so the caller can report them.
//
// We use the `scraper` crate for the structural queries (CSS selectors)
// and `url` to turn relative image paths into absolute URLs.
//
// Rust concepts:
// - Lazy statics: selectors and regexes are compiled once, on first use
// - Result<Option<T>, E>: "failed", "skipped" and "got one" in one type
// =============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::item::{Item, ItemFault, PageResult};
use crate::error::CrawlError;

// Image used by the catalog when a product has no picture
const PLACEHOLDER_IMAGE: &str = "/img/s/noimg/pr_80.png";

// Selectors are constants and known to be valid, so unwrap() here is a
// programmer error check, the same as in the link checker's html module
static PRODUCT_CARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td#catalogue > ul.catalog > li > div.c-box").unwrap());
static TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.info > div.title-box > h3 > a").unwrap());
static MID_PRICE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.pr-box > div.price > span.orng").unwrap());
static PRICE_RANGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.pr-box > div.price > span.blck").unwrap());
static IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.img-box > a > div > img").unwrap());

static TRAILING_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{3,}\z").unwrap());
static SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"/.+/(.+)/").unwrap());
static RANGE_LOW: Lazy<Regex> = Lazy::new(|| Regex::new(r"(.*) - .* .*").unwrap());
static RANGE_HIGH: Lazy<Regex> = Lazy::new(|| Regex::new(r".* - (.*) .*").unwrap());

// Extracts Items from catalog pages
//
// Holds the catalog's base URL so relative image paths can be resolved.
// Cloning is cheap and the struct is Send + Sync, so one instance can be
// shared by every page task through an Arc.
#[derive(Debug, Clone)]
pub struct Extractor {
    base_url: Url,
}

impl Extractor {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    // Extracts every product card on one page
    //
    // Parameters:
    //   index: the page's zero-based index (carried into the result)
    //   html: the raw page HTML
    //
    // Returns: PageResult with items and faults, both in document order
    pub fn extract_page(&self, index: usize, html: &str) -> PageResult {
        let document = Html::parse_document(html);
        let mut page = PageResult {
            index,
            ..PageResult::default()
        };

        for (position, card) in document.select(&PRODUCT_CARD).enumerate() {
            match self.extract_item(card) {
                Ok(Some(item)) => page.items.push(item),
                Ok(None) => {}
                Err(error) => page.faults.push(ItemFault { position, error }),
            }
        }

        page
    }

    // Extracts one product card
    //
    // Returns:
    //   Ok(Some(item)) - a product with a positive mid price
    //   Ok(None)       - no mid price, the card is skipped
    //   Err(e)         - the card has a price but a required part is broken
    pub fn extract_item(&self, card: ElementRef<'_>) -> Result<Option<Item>, CrawlError> {
        // The mid price decides whether we look at the card at all
        let mid_price = digits(&text_at(card, &MID_PRICE));
        if mid_price == 0 {
            return Ok(None);
        }

        let (min_price, max_price) = price_range(&text_at(card, &PRICE_RANGE), mid_price)?;

        Ok(Some(Item {
            name: parse_name(card),
            filename: parse_filename(card)?,
            image_url: self.parse_image_url(card),
            min_price,
            mid_price,
            max_price,
        }))
    }

    // Reads the image source and makes it absolute
    //
    // Falls back to the catalog's placeholder image when the card has no
    // image (or an image with an empty src).
    fn parse_image_url(&self, card: ElementRef<'_>) -> String {
        let src = card
            .select(&IMAGE)
            .next()
            .and_then(|img| img.value().attr("src"))
            .filter(|src| !src.trim().is_empty());

        match src {
            Some(src) => self.resolve(src),
            None => self.resolve(PLACEHOLDER_IMAGE),
        }
    }

    // Root-relative paths are appended to the base URL, the same way page
    // URLs are built, so a base with a path prefix ("/ru") keeps it.
    // Anything else (absolute or protocol-relative URLs, bare relative
    // paths) goes through Url::join.
    fn resolve(&self, path: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        if path.starts_with('/') && !path.starts_with("//") {
            return format!("{}{}", base, path);
        }

        match self.base_url.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}/{}", base, path),
        }
    }
}

// Concatenated text of every node the selector matches inside the card
fn text_at(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector).flat_map(|node| node.text()).collect()
}

// Keeps only ASCII digits and parses them; no digits means 0
fn digits(text: &str) -> u64 {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

// Parses "<low> - <high> <unit>" into (min, max)
//
// An empty range falls back to (mid, mid). A range that doesn't match the
// pattern, or doesn't contain the mid price, is a RangeFormat error.
fn price_range(text: &str, mid_price: u64) -> Result<(u64, u64), CrawlError> {
    // Markup text can be spread over several lines and use &nbsp;
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return Ok((mid_price, mid_price));
    }

    let low = RANGE_LOW.captures(&text).map(|caps| digits(&caps[1]));
    let high = RANGE_HIGH.captures(&text).map(|caps| digits(&caps[1]));

    match (low, high) {
        (Some(low), Some(high)) if low <= mid_price && mid_price <= high => Ok((low, high)),
        _ => Err(CrawlError::RangeFormat { text }),
    }
}

fn parse_name(card: ElementRef<'_>) -> Option<String> {
    let name = text_at(card, &TITLE_LINK);
    if name.is_empty() {
        return None;
    }
    Some(TRAILING_WHITESPACE.replace(&name, "").into_owned())
}

// "/deti/konstruktory/lego-123/" -> "lego-123"
fn parse_filename(card: ElementRef<'_>) -> Result<String, CrawlError> {
    let href = card
        .select(&TITLE_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .ok_or(CrawlError::StructuralParse {
            element: "detail link",
        })?;

    SLUG.captures(href)
        .map(|caps| caps[1].to_string())
        .ok_or(CrawlError::StructuralParse {
            element: "detail link slug",
        })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is Lazy?
//    - once_cell::sync::Lazy runs its closure the first time it's used
//    - After that every use gets the same, already-built value
//    - Perfect for selectors and regexes that never change
//
// 2. Why return Result<Option<Item>, CrawlError>?
//    - Three outcomes: an item, nothing (skipped), or an error
//    - The caller can tell "no price, ignore it" apart from "broken card"
//
// 3. What does ElementRef::select do?
//    - Runs a CSS selector against everything inside one element
//    - Lets us query a single product card instead of the whole page
//
// 4. Why does Html never leave this module?
//    - scraper's Html type isn't Send, so it can't be held across an .await
//    - We parse, extract and drop it inside one synchronous call
// -----------------------------------------------------------------------------
