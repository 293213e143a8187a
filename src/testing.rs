// src/testing.rs
// =============================================================================
// Test helpers shared by the unit tests (compiled only under cfg(test)).
//
// - CardSpec / card / catalog_page: build catalog HTML fixtures
// - ScriptedFetcher: an in-memory PageFetcher with optional per-URL delay
// =============================================================================

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::crawl::PageFetcher;
use crate::error::CrawlError;

// One product card; every field defaults to a healthy product
pub struct CardSpec<'a> {
    pub name: &'a str,
    pub href: &'a str,
    pub mid: &'a str,
    pub range: &'a str,
    pub image: Option<&'a str>,
}

impl Default for CardSpec<'_> {
    fn default() -> Self {
        Self {
            name: "LEGO Classic",
            href: "/deti/konstruktory/lego-123/",
            mid: "300 грн",
            range: "",
            image: Some("/img/tx/123/lego.jpg"),
        }
    }
}

pub fn card(spec: &CardSpec<'_>) -> String {
    let image = spec
        .image
        .map(|src| {
            format!(
                r#"<div class="img-box"><a href="{}"><div><img src="{}"></div></a></div>"#,
                spec.href, src
            )
        })
        .unwrap_or_default();

    format!(
        r#"<li><div class="c-box">{image}<div class="info"><div class="title-box"><h3><a href="{href}">{name}</a></h3></div></div><div class="pr-box"><div class="price"><span class="orng">{mid}</span><span class="blck">{range}</span></div></div></div></li>"#,
        image = image,
        href = spec.href,
        name = spec.name,
        mid = spec.mid,
        range = spec.range,
    )
}

// A catalog page holding the given cards and, optionally, a pager whose
// links run from 1 to last_page
pub fn catalog_page(cards: &[String], last_page: Option<u32>) -> String {
    let pager = last_page
        .map(|last| {
            let links: String = (1..=last)
                .map(|n| format!(r#"<a href="?p={}">{}</a>"#, n - 1, n))
                .collect();
            format!(r#"<div class="pager"><span>{}</span></div>"#, links)
        })
        .unwrap_or_default();

    format!(
        r#"<html><body><table><tr><td id="catalogue"><ul class="catalog">{}</ul></td></tr></table>{}</body></html>"#,
        cards.concat(),
        pager
    )
}

#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, (String, Duration)>,
    bytes: HashMap<String, Vec<u8>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.with_slow_page(url, html, Duration::ZERO)
    }

    pub fn with_slow_page(
        mut self,
        url: impl Into<String>,
        html: impl Into<String>,
        delay: Duration,
    ) -> Self {
        self.pages.insert(url.into(), (html.into(), delay));
        self
    }

    pub fn with_bytes(mut self, url: impl Into<String>, bytes: &[u8]) -> Self {
        self.bytes.insert(url.into(), bytes.to_vec());
        self
    }

    /// Number of fetch_text calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn not_found(url: &str) -> CrawlError {
    CrawlError::Fetch {
        url: url.to_string(),
        reason: "HTTP 404 Not Found".to_string(),
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, CrawlError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (html, delay) = self.pages.get(url).ok_or_else(|| not_found(url))?;
        if !delay.is_zero() {
            tokio::time::sleep(*delay).await;
        }
        Ok(html.clone())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, CrawlError> {
        self.bytes.get(url).cloned().ok_or_else(|| not_found(url))
    }
}
