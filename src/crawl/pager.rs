// src/crawl/pager.rs
// =============================================================================
// Works out how many catalog pages there are.
//
// The first page has a pager control listing page numbers. The text of the
// last link in it is the number of the final page as shown to users ("17").
//
// Pages are requested with a zero-based `p=` parameter, so the highest index
// we crawl is that number minus one. With `include_last_page` the crawl goes
// one index further.
//
// A pager number above MAX_PAGES is refused rather than crawled: it's far
// beyond any real catalog and would otherwise queue that many requests.
// =============================================================================

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::error::CrawlError;

// Upper bound on the number of page indices one crawl will schedule
pub const MAX_PAGES: usize = 10_000;

static LAST_PAGER_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.pager > span > a:last-of-type").unwrap());

// Reads the last visible page number from a catalog page
//
// Returns None when there is no pager or its text doesn't start with a number.
pub fn last_visible_page(html: &str) -> Option<u64> {
    let document = Html::parse_document(html);
    let text: String = document
        .select(&LAST_PAGER_LINK)
        .flat_map(|link| link.text())
        .collect();

    leading_number(&text)
}

// Highest zero-based page index to crawl
//
// Parameters:
//   last_visible: the pager's last number (None = no pager, one page)
//   exclude_last_page: stop at last_visible - 1
//
// Examples:
//   Some(17), true  -> 16
//   Some(17), false -> 17
//   None,     true  -> 0
//
// A pager reading 0 counts as one page: page 0 was just fetched, so it
// exists and its items are crawled.
//
// Returns: Err(PageCount) when the pages to crawl would exceed MAX_PAGES
pub fn highest_page_index(
    last_visible: Option<u64>,
    exclude_last_page: bool,
) -> Result<usize, CrawlError> {
    let shown = last_visible.unwrap_or(1).max(1);
    let highest = if exclude_last_page { shown - 1 } else { shown };

    // Indices 0..=highest are crawled, so highest + 1 pages in total
    match usize::try_from(highest) {
        Ok(highest) if highest < MAX_PAGES => Ok(highest),
        _ => Err(CrawlError::PageCount {
            shown,
            limit: MAX_PAGES,
        }),
    }
}

// Parses the digits at the start of the text, ignoring leading whitespace
fn leading_number(text: &str) -> Option<u64> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().ok()
}
