//! Page scraping for asset discovery
//!
//! The controller never parses markup itself. It asks a [`PageScraper`] for
//! the absolute asset URLs a page references. [`HtmlScraper`] is the default
//! implementation:
//! - GETs the page with the shared request options
//! - Resolves references against the final (post-redirect) URL
//! - Keeps only http/https targets, deduplicated per page

use crate::crawler::checker::RequestOptions;
use crate::crawler::outcome::AssetKind;
use crate::{CheckerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Assets discovered on one page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrapedPage {
    /// Absolute asset URLs with the kind of reference they came from
    pub assets: Vec<(String, AssetKind)>,

    /// The page URL after redirects
    pub final_url: String,
}

/// Source of asset references for a page
#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Fetches `page_url` and lists the assets it references
    ///
    /// A failure here skips the page; it never aborts the crawl.
    async fn scrape(&self, page_url: &str) -> Result<ScrapedPage>;
}

/// Scraper that fetches pages over HTTP and parses them as HTML
#[derive(Debug, Clone)]
pub struct HtmlScraper {
    client: Client,
    options: RequestOptions,
}

impl HtmlScraper {
    pub fn new(client: Client, options: RequestOptions) -> Self {
        Self { client, options }
    }
}

#[async_trait]
impl PageScraper for HtmlScraper {
    async fn scrape(&self, page_url: &str) -> Result<ScrapedPage> {
        let page_fetch = |message: String| CheckerError::PageFetch {
            url: page_url.to_string(),
            message,
        };

        let response = self
            .options
            .authorize(self.client.get(page_url))
            .send()
            .await
            .map_err(|e| page_fetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(page_fetch(format!("HTTP {}", status.as_u16())));
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(|e| page_fetch(e.to_string()))?;

        let assets = extract_assets(&body, &final_url);
        tracing::debug!("Found {} assets on {}", assets.len(), final_url);

        Ok(ScrapedPage {
            assets,
            final_url: final_url.to_string(),
        })
    }
}

/// Extracts asset references from an HTML document
///
/// # Extraction Rules
///
/// | Element | Attribute | Kind |
/// |---------|-----------|------|
/// | `<a>` | `href` | Link |
/// | `<img>` | `src` | Image |
/// | `<script>` | `src` | Script |
/// | `<link rel="stylesheet">` / `<link rel="icon">` | `href` | Styles/Icon |
/// | `<iframe>` | `src` | Iframe |
///
/// Non-http(s) results (`mailto:`, `javascript:`, `data:`) are dropped.
/// Duplicate `(url, kind)` pairs keep their first position.
///
/// # Example
///
/// ```
/// use deadlink_checker::crawler::extract_assets;
/// use deadlink_checker::AssetKind;
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><img src="logo.png">"#;
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// let assets = extract_assets(html, &base);
/// assert_eq!(assets[0], ("https://example.com/about".to_string(), AssetKind::Link));
/// assert_eq!(assets[1], ("https://example.com/docs/logo.png".to_string(), AssetKind::Image));
/// ```
pub fn extract_assets(html: &str, base_url: &Url) -> Vec<(String, AssetKind)> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut assets = Vec::new();

    let mut push = |raw: &str, kind: AssetKind| {
        if let Some(absolute) = resolve_reference(raw, base_url) {
            if seen.insert((absolute.clone(), kind)) {
                assets.push((absolute, kind));
            }
        }
    };

    for (selector, attr, kind) in [
        ("a[href]", "href", AssetKind::Link),
        ("img[src]", "src", AssetKind::Image),
        ("script[src]", "src", AssetKind::Script),
    ] {
        if let Ok(selector) = Selector::parse(selector) {
            for element in document.select(&selector) {
                if let Some(value) = element.value().attr(attr) {
                    push(value, kind);
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("link[href]") {
        for element in document.select(&selector) {
            let rel = element.value().attr("rel").unwrap_or("");
            let styles_or_icon = rel
                .split_ascii_whitespace()
                .any(|token| token.eq_ignore_ascii_case("stylesheet") || token.eq_ignore_ascii_case("icon"));

            if styles_or_icon {
                if let Some(href) = element.value().attr("href") {
                    push(href, AssetKind::StylesIcon);
                }
            }
        }
    }

    if let Ok(selector) = Selector::parse("iframe[src]") {
        for element in document.select(&selector) {
            if let Some(src) = element.value().attr("src") {
                push(src, AssetKind::Iframe);
            }
        }
    }

    assets
}

/// Resolves a reference against the page URL, keeping only http(s) results
fn resolve_reference(raw: &str, base_url: &Url) -> Option<String> {
    let resolved = base_url.join(raw.trim()).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved.to_string()),
        _ => None,
    }
}
