//! Crawler module for link discovery and checking
//!
//! This module contains the core checking logic, including:
//! - Per-asset HTTP checks with HEAD/GET fallback
//! - HTML scraping for asset discovery
//! - Sitemap resolution
//! - Overall crawl coordination
//!
//! [`check_all`] is the entry point front ends call.

mod checker;
mod coordinator;
mod outcome;
mod scraper;
mod sitemap;

pub use checker::{
    build_http_client, AssetChecker, RequestOptions, TransportFailure, HEAD_FALLBACK_STATUSES,
};
pub use coordinator::{Coordinator, CrawlRun, CrawlSettings};
pub use outcome::{round_seconds, AssetKind, CheckOutcome};
pub use scraper::{extract_assets, HtmlScraper, PageScraper, ScrapedPage};
pub use sitemap::{parse_sitemap, SitemapDocument, SitemapResolver};

use crate::config::{validate_header, validate_seed_url, CheckerConfig, Credentials, MAX_WORKERS};
use crate::output::ProgressSink;
use crate::state::CrawlControl;
use crate::url::ExclusionFilter;
use crate::{ConfigError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Everything a single check run needs
#[derive(Debug, Clone)]
pub struct CheckRequest {
    /// Page or sitemap the run starts from
    pub seed_url: String,

    /// Concurrent checks per page
    pub workers: usize,

    /// Per-request timeout
    pub timeout: Duration,

    /// 1 checks only the seed page; 2+ follows internal links
    pub max_depth: u32,

    pub credentials: Option<Credentials>,

    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,

    pub user_agent: String,

    /// Exclusion patterns (regex, or substring when not a valid regex)
    pub exclude: Vec<String>,

    /// Whether assets on other hosts are checked
    pub check_external: bool,
}

impl CheckRequest {
    /// Creates a request with default settings
    pub fn new(seed_url: impl Into<String>) -> Self {
        Self::from_config(seed_url, &CheckerConfig::default())
    }

    /// Creates a request from a loaded configuration
    pub fn from_config(seed_url: impl Into<String>, config: &CheckerConfig) -> Self {
        Self {
            seed_url: seed_url.into(),
            workers: config.crawler.workers,
            timeout: Duration::from_secs(config.crawler.timeout_secs),
            max_depth: config.crawler.max_depth,
            credentials: config.request.auth.clone(),
            headers: config.request.headers.clone(),
            user_agent: config.request.user_agent.clone(),
            exclude: config.exclude.clone(),
            check_external: config.crawler.check_external,
        }
    }

    /// Returns the run mode this request dispatches to
    pub fn mode(&self) -> CheckMode {
        CheckMode::for_request(&self.seed_url, self.max_depth)
    }

    /// Rejects requests that cannot start
    pub fn validate(&self) -> Result<()> {
        validate_seed_url(&self.seed_url)?;

        if self.workers < 1 || self.workers > MAX_WORKERS {
            return Err(ConfigError::Validation(format!(
                "workers must be between 1 and {}, got {}",
                MAX_WORKERS, self.workers
            ))
            .into());
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::Validation("timeout must be positive".to_string()).into());
        }

        for (name, value) in &self.headers {
            validate_header(name, value)?;
        }

        Ok(())
    }

    fn request_options(&self) -> RequestOptions {
        RequestOptions {
            timeout: self.timeout,
            user_agent: self.user_agent.clone(),
            headers: self.headers.clone(),
            credentials: self.credentials.clone(),
        }
    }

    fn settings(&self) -> CrawlSettings {
        CrawlSettings {
            workers: self.workers,
            check_external: self.check_external,
            exclusions: ExclusionFilter::new(&self.exclude),
        }
    }
}

/// How a run discovers the pages it checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Pages come from a sitemap; links are not followed
    Sitemap,

    /// Breadth-first crawl following internal links
    Crawl,

    /// Only the seed page's assets are checked
    SinglePage,
}

impl CheckMode {
    /// Picks the mode for a seed URL and depth
    ///
    /// A seed that mentions "sitemap" anywhere is treated as a sitemap.
    pub fn for_request(seed_url: &str, max_depth: u32) -> Self {
        if seed_url.ends_with("sitemap.xml") || seed_url.to_lowercase().contains("sitemap") {
            Self::Sitemap
        } else if max_depth > 1 {
            Self::Crawl
        } else {
            Self::SinglePage
        }
    }
}

/// Checks every link and asset reachable from the request's seed
///
/// Dispatches to sitemap mode, a recursive crawl or a single-page check,
/// see [`CheckMode::for_request`]. The only error is an invalid request;
/// everything that goes wrong during the run is reported on `sink` and
/// reflected in the outcomes.
///
/// # Example
///
/// ```no_run
/// use deadlink_checker::{check_all, CheckRequest, CrawlControl, ProgressSink};
///
/// # async fn run() -> deadlink_checker::Result<()> {
/// let mut request = CheckRequest::new("https://example.com");
/// request.max_depth = 2;
///
/// let outcomes = check_all(request, ProgressSink::disabled(), CrawlControl::new()).await?;
/// let dead = outcomes.iter().filter(|o| o.is_dead).count();
/// println!("{} dead links", dead);
/// # Ok(())
/// # }
/// ```
pub async fn check_all(
    request: CheckRequest,
    sink: ProgressSink,
    control: CrawlControl,
) -> Result<Vec<CheckOutcome>> {
    Ok(run_check(request, sink, control).await?.outcomes)
}

/// Like [`check_all`], but also reports how the run ended
pub async fn run_check(
    request: CheckRequest,
    sink: ProgressSink,
    control: CrawlControl,
) -> Result<CrawlRun> {
    let options = request.request_options();
    let client = build_http_client(&options)?;
    let scraper = Arc::new(HtmlScraper::new(client.clone(), options.clone()));

    run_check_with(request, client, scraper, sink, control).await
}

/// Runs a check with a caller-supplied page scraper
pub async fn run_check_with(
    request: CheckRequest,
    client: reqwest::Client,
    scraper: Arc<dyn PageScraper>,
    sink: ProgressSink,
    control: CrawlControl,
) -> Result<CrawlRun> {
    request.validate()?;

    let options = request.request_options();
    let checker = AssetChecker::with_client(client.clone(), options.clone());
    let mode = request.mode();
    tracing::info!("Checking {} in {:?} mode", request.seed_url, mode);

    let coordinator = Coordinator::new(
        request.seed_url.clone(),
        scraper,
        checker,
        request.settings(),
        sink.clone(),
        control,
    );

    let run = match mode {
        CheckMode::Sitemap => {
            sink.line(format!("Parsing sitemap: {}", request.seed_url));
            let pages = SitemapResolver::new(client, options)
                .resolve(&request.seed_url, &sink)
                .await;
            sink.line(format!("Found {} pages in sitemap to analyze", pages.len()));
            coordinator.crawl_pages(pages).await
        }
        CheckMode::Crawl => coordinator.crawl(request.max_depth).await,
        CheckMode::SinglePage => coordinator.crawl(0).await,
    };

    Ok(run)
}
