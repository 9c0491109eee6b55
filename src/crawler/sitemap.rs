//! Sitemap resolution
//!
//! Flattens a sitemap (or a tree of sitemap indexes) into a deduplicated
//! list of page URLs. A nested sitemap that fails to load drops only its own
//! branch; its siblings are still resolved.

use crate::crawler::checker::RequestOptions;
use crate::output::ProgressSink;
use crate::{CheckerError, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};

/// Contents of a single sitemap document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapDocument {
    /// `<url><loc>` entries
    pub pages: Vec<String>,

    /// `<sitemap><loc>` entries of a sitemap index
    pub sitemaps: Vec<String>,
}

impl SitemapDocument {
    pub fn is_index(&self) -> bool {
        !self.sitemaps.is_empty()
    }
}

/// Parses a sitemap or sitemap index document
///
/// Namespace prefixes are ignored. Only absolute http(s) locations are kept.
///
/// # Example
///
/// ```
/// use deadlink_checker::crawler::parse_sitemap;
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// let doc = parse_sitemap(xml).unwrap();
/// assert_eq!(doc.pages, vec!["https://example.com/a".to_string()]);
/// assert!(!doc.is_index());
/// ```
pub fn parse_sitemap(xml: &str) -> std::result::Result<SitemapDocument, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut doc = SitemapDocument::default();
    let mut in_sitemap = false;
    let mut in_loc = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"sitemap" => in_sitemap = true,
                b"loc" => in_loc = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"sitemap" => in_sitemap = false,
                b"loc" => in_loc = false,
                _ => {}
            },
            Event::Text(t) if in_loc => push_loc(&mut doc, &t.unescape()?, in_sitemap),
            Event::CData(t) if in_loc => {
                push_loc(&mut doc, &String::from_utf8_lossy(&t.into_inner()), in_sitemap)
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(doc)
}

/// Records one `<loc>` value, keeping only http(s) locations
fn push_loc(doc: &mut SitemapDocument, loc: &str, in_sitemap: bool) {
    let loc = loc.trim();
    if !(loc.starts_with("http://") || loc.starts_with("https://")) {
        return;
    }
    if in_sitemap {
        doc.sitemaps.push(loc.to_string());
    } else {
        doc.pages.push(loc.to_string());
    }
}

/// Fetches sitemaps and flattens them into page URLs
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    client: Client,
    options: RequestOptions,
}

impl SitemapResolver {
    pub fn new(client: Client, options: RequestOptions) -> Self {
        Self { client, options }
    }

    /// Resolves a sitemap URL into a deduplicated page list
    ///
    /// Nested indexes are followed breadth-first; a sitemap URL is fetched
    /// at most once, so reference cycles terminate. An index contributes
    /// only the pages of the sitemaps it lists.
    ///
    /// Failures never propagate: a failing top-level sitemap yields an empty
    /// list, a failing nested sitemap drops its branch. Both are reported on
    /// `sink` as errors.
    pub async fn resolve(&self, sitemap_url: &str, sink: &ProgressSink) -> Vec<String> {
        let mut queue = VecDeque::from([sitemap_url.to_string()]);
        let mut fetched = HashSet::new();
        let mut seen_pages = HashSet::new();
        let mut pages = Vec::new();

        while let Some(current) = queue.pop_front() {
            if !fetched.insert(current.clone()) {
                tracing::trace!("Sitemap {} already resolved", current);
                continue;
            }

            let doc = match self.fetch(&current).await {
                Ok(doc) => doc,
                Err(e) => {
                    tracing::warn!("{}", e);
                    sink.error(format!("Error parsing sitemap: {}", e));
                    continue;
                }
            };

            if doc.is_index() {
                tracing::debug!("Sitemap index {} lists {} sitemaps", current, doc.sitemaps.len());
                queue.extend(doc.sitemaps);
                continue;
            }

            for page in doc.pages {
                if seen_pages.insert(page.clone()) {
                    pages.push(page);
                }
            }
        }

        pages
    }

    /// Fetches and parses one sitemap document
    async fn fetch(&self, sitemap_url: &str) -> Result<SitemapDocument> {
        let sitemap_error = |message: String| CheckerError::Sitemap {
            url: sitemap_url.to_string(),
            message,
        };

        let response = self
            .options
            .authorize(self.client.get(sitemap_url))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| sitemap_error(e.to_string()))?;

        let body = response.text().await.map_err(|e| sitemap_error(e.to_string()))?;

        parse_sitemap(&body).map_err(|e| sitemap_error(e.to_string()))
    }
}
