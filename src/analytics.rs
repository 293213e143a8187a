// src/analytics.rs
// =============================================================================
// Price summaries over the crawled items.
//
// - cheapest: the item with the lowest min price
// - most_expensive: the item with the highest max price
// - overall_mid_price: the average mid price
//
// All of them return EmptyCollection instead of dividing by zero or picking
// from an empty list.
// =============================================================================

use serde::Serialize;

use crate::catalog::Item;
use crate::error::CrawlError;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub item_count: usize,
    pub cheapest: Item,
    pub most_expensive: Item,
    pub overall_mid_price: f64,
}

// min_by_key keeps the first of several equal minimums, the same answer a
// stable ascending sort followed by "take first" gives
pub fn cheapest(items: &[Item]) -> Result<&Item, CrawlError> {
    items
        .iter()
        .min_by_key(|item| item.min_price)
        .ok_or(CrawlError::EmptyCollection)
}

// max_by_key keeps the last of several equal maximums (stable sort, take last)
pub fn most_expensive(items: &[Item]) -> Result<&Item, CrawlError> {
    items
        .iter()
        .max_by_key(|item| item.max_price)
        .ok_or(CrawlError::EmptyCollection)
}

pub fn overall_mid_price(items: &[Item]) -> Result<f64, CrawlError> {
    if items.is_empty() {
        return Err(CrawlError::EmptyCollection);
    }

    let total: f64 = items.iter().map(|item| item.mid_price as f64).sum();
    Ok(total / items.len() as f64)
}

pub fn summarize(items: &[Item]) -> Result<Summary, CrawlError> {
    Ok(Summary {
        item_count: items.len(),
        cheapest: cheapest(items)?.clone(),
        most_expensive: most_expensive(items)?.clone(),
        overall_mid_price: overall_mid_price(items)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(filename: &str, min: u64, mid: u64, max: u64) -> Item {
        Item {
            name: Some(filename.to_uppercase()),
            filename: filename.to_string(),
            image_url: format!("http://shop.test/img/{}.jpg", filename),
            min_price: min,
            mid_price: mid,
            max_price: max,
        }
    }

    #[test]
    fn test_cheapest_first_of_ties_wins() {
        let items = vec![
            item("a", 50, 60, 70),
            item("b", 10, 20, 30),
            item("c", 10, 15, 90),
        ];
        assert_eq!(cheapest(&items).unwrap().filename, "b");
    }

    #[test]
    fn test_most_expensive_last_of_ties_wins() {
        let items = vec![
            item("a", 50, 60, 90),
            item("b", 10, 20, 30),
            item("c", 10, 15, 90),
        ];
        assert_eq!(most_expensive(&items).unwrap().filename, "c");
    }

    #[test]
    fn test_overall_mid_price_is_not_truncated() {
        let items = vec![item("a", 1, 1, 1), item("b", 2, 2, 2)];
        assert_eq!(overall_mid_price(&items).unwrap(), 1.5);
    }

    #[test]
    fn test_overall_mid_price_is_the_mean() {
        let items = vec![
            item("a", 100, 300, 400),
            item("b", 50, 60, 70),
            item("c", 10, 15, 20),
        ];
        let expected = (300 + 60 + 15) as f64 / 3.0;
        assert_eq!(overall_mid_price(&items).unwrap(), expected);
    }

    #[test]
    fn test_empty_collection() {
        let items: Vec<Item> = Vec::new();
        assert!(matches!(cheapest(&items), Err(CrawlError::EmptyCollection)));
        assert!(matches!(most_expensive(&items), Err(CrawlError::EmptyCollection)));
        assert!(matches!(overall_mid_price(&items), Err(CrawlError::EmptyCollection)));
        assert!(summarize(&items).is_err());
    }

    #[test]
    fn test_summary() {
        let items = vec![item("a", 5, 10, 15), item("b", 20, 30, 40)];
        let summary = summarize(&items).unwrap();
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.cheapest.filename, "a");
        assert_eq!(summary.most_expensive.filename, "b");
        assert_eq!(summary.overall_mid_price, 20.0);
    }
}
