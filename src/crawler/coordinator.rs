//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the controller loop that drives a check run:
//! - Managing the breadth-first frontier and the depth ceiling
//! - Owning the visited-page and checked-asset sets
//! - Filtering each page's assets (exclusions, externality, dedup)
//! - Dispatching asset checks to a bounded worker pool
//! - Honoring pause and stop signals between pages and before each check
//!
//! The bookkeeping sets live only on the `Coordinator`. Workers receive owned
//! copies of what they need and hand outcomes back through the stream, so no
//! locking is required.

use crate::crawler::checker::AssetChecker;
use crate::crawler::outcome::{AssetKind, CheckOutcome};
use crate::crawler::scraper::PageScraper;
use crate::output::ProgressSink;
use crate::state::{CrawlControl, CrawlPhase};
use crate::url::{has_non_html_extension, is_external, normalize_url, ExclusionFilter};
use futures::stream::{self, StreamExt};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Per-run knobs for the batch pipeline
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Concurrent checks per page batch
    pub workers: usize,

    /// Whether assets outside the seed's host are checked
    pub check_external: bool,

    pub exclusions: ExclusionFilter,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            workers: 10,
            check_external: true,
            exclusions: ExclusionFilter::default(),
        }
    }
}

/// Result of a finished (or stopped) run
#[derive(Debug, Clone)]
pub struct CrawlRun {
    /// Outcomes in publication order
    pub outcomes: Vec<CheckOutcome>,

    /// `Completed` or `Stopped`
    pub phase: CrawlPhase,

    /// Number of distinct pages dequeued
    pub pages_visited: usize,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    seed: String,
    scraper: Arc<dyn PageScraper>,
    checker: AssetChecker,
    settings: CrawlSettings,
    sink: ProgressSink,
    control: CrawlControl,
    phase: CrawlPhase,
    visited: HashSet<String>,
    checked: HashSet<String>,
    outcomes: Vec<CheckOutcome>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `seed` - The URL every externality decision is measured against
    /// * `scraper` - Source of asset references for each page
    /// * `checker` - Issues the per-asset checks
    /// * `settings` - Worker count, exclusions and external-asset policy
    /// * `sink` - Receives progress events
    /// * `control` - Pause/stop handle shared with the caller
    pub fn new(
        seed: impl Into<String>,
        scraper: Arc<dyn PageScraper>,
        checker: AssetChecker,
        settings: CrawlSettings,
        sink: ProgressSink,
        control: CrawlControl,
    ) -> Self {
        Self {
            seed: seed.into(),
            scraper,
            checker,
            settings,
            sink,
            control,
            phase: CrawlPhase::Idle,
            visited: HashSet::new(),
            checked: HashSet::new(),
            outcomes: Vec::new(),
        }
    }

    /// Runs a breadth-first crawl from the seed
    ///
    /// Pages are scheduled at `depth + 1` only while `depth < max_depth`, so
    /// `max_depth == 0` scrapes the seed alone and nothing beyond it.
    ///
    /// # Flow
    ///
    /// 1. Pop the front entry; skip it if its normalized URL was visited
    /// 2. Stop if signaled, block while paused
    /// 3. Mark visited; skip excluded pages
    /// 4. Scrape the page (failures skip the page)
    /// 5. Check its assets as one batch
    /// 6. Enqueue live, internal, HTML-like results that were not visited
    pub async fn crawl(mut self, max_depth: u32) -> CrawlRun {
        tracing::info!("Starting crawl of {} (max depth {})", self.seed, max_depth);
        self.set_phase(CrawlPhase::Running);

        let mut frontier: VecDeque<(String, u32)> = VecDeque::from([(self.seed.clone(), 0)]);

        while let Some((page_url, depth)) = frontier.pop_front() {
            let key = url_key(&page_url);
            if self.visited.contains(&key) {
                tracing::trace!("Already visited {}", page_url);
                continue;
            }

            if !self.wait_for_gate().await {
                tracing::info!("Stop requested, abandoning {} queued pages", frontier.len() + 1);
                break;
            }

            self.visited.insert(key);

            if self.settings.exclusions.is_excluded(&page_url) {
                tracing::debug!("Excluding page {}", page_url);
                self.sink.line(format!("Excluding page: {}", page_url));
                continue;
            }

            self.sink
                .line(format!("Crawling [depth {}/{}]: {}", depth, max_depth, page_url));

            let page = match self.scraper.scrape(&page_url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Skipping page {}: {}", page_url, e);
                    self.sink.error(format!("Error crawling {}: {}", page_url, e));
                    continue;
                }
            };

            let results = self.check_batch(&page_url, page.assets).await;

            if depth < max_depth {
                for outcome in &results {
                    if self.is_crawlable(outcome) {
                        tracing::debug!("Queueing {} at depth {}", outcome.target_url, depth + 1);
                        frontier.push_back((outcome.target_url.clone(), depth + 1));
                    }
                }
            }
        }

        self.finish()
    }

    /// Checks a fixed list of pages without following links
    ///
    /// Each page's own URL is checked alongside its assets.
    pub async fn crawl_pages(mut self, pages: Vec<String>) -> CrawlRun {
        tracing::info!("Checking {} listed pages", pages.len());
        self.set_phase(CrawlPhase::Running);

        let total = pages.len();
        for (index, page_url) in pages.into_iter().enumerate() {
            if !self.wait_for_gate().await {
                tracing::info!("Stop requested, abandoning {} listed pages", total - index);
                break;
            }

            if self.settings.exclusions.is_excluded(&page_url) {
                self.sink.line(format!("Excluding sitemap page: {}", page_url));
                continue;
            }

            self.visited.insert(url_key(&page_url));
            self.sink
                .line(format!("Sitemap page {}/{}: {}", index + 1, total, page_url));

            let mut page = match self.scraper.scrape(&page_url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("Skipping sitemap page {}: {}", page_url, e);
                    self.sink.error(format!("Error crawling {}: {}", page_url, e));
                    continue;
                }
            };

            page.assets.push((page_url.clone(), AssetKind::Link));
            self.check_batch(&page_url, page.assets).await;
        }

        self.finish()
    }

    /// Filters one page's assets and checks the survivors concurrently
    ///
    /// Returns this batch's outcomes in completion order. Outcomes are also
    /// appended to the run's result list.
    async fn check_batch(
        &mut self,
        page_url: &str,
        assets: Vec<(String, AssetKind)>,
    ) -> Vec<CheckOutcome> {
        let mut batch_keys = HashSet::new();
        let mut batch = Vec::new();

        for (asset_url, kind) in assets {
            let key = url_key(&asset_url);

            if self.checked.contains(&key) {
                tracing::trace!("Already checked {}", asset_url);
                continue;
            }

            if self.settings.exclusions.is_excluded(&asset_url) {
                tracing::debug!("Excluding asset {}", asset_url);
                self.sink.line(format!("Excluding: {}", asset_url));
                self.checked.insert(key);
                continue;
            }

            if !self.settings.check_external && is_external(&asset_url, &self.seed) {
                tracing::trace!("Skipping external asset {}", asset_url);
                self.checked.insert(key);
                continue;
            }

            if batch_keys.insert(key) {
                batch.push((asset_url, kind));
            }
        }

        let total = batch.len();
        if total == 0 {
            return Vec::new();
        }

        self.sink
            .line(format!("Checking {} assets on {}", total, page_url));

        let checker = self.checker.clone();
        let control = self.control.clone();
        let discovered_on = page_url.to_string();

        let mut results = stream::iter(batch)
            .map(move |(asset_url, kind)| {
                let checker = checker.clone();
                let control = control.clone();
                let discovered_on = discovered_on.clone();
                async move {
                    if !control.wait_while_paused().await {
                        return None;
                    }
                    Some(checker.check(&asset_url, &discovered_on, kind).await)
                }
            })
            .buffer_unordered(self.settings.workers.max(1));

        let mut completed = 0;
        let mut page_outcomes = Vec::with_capacity(total);

        // Workers hold at the gate themselves; this loop publishes the phase
        let control = self.control.clone();
        let mut paused = false;

        loop {
            let watching = !control.is_stopped();
            let result = tokio::select! {
                result = results.next() => result,
                resumed = control.wait_while_paused(), if paused && watching => {
                    if resumed {
                        paused = false;
                        self.set_phase(CrawlPhase::Running);
                        self.sink.line("Resumed");
                    }
                    continue;
                }
                _ = control.paused_or_stopped(), if !paused && watching => {
                    if control.is_paused() && !control.is_stopped() {
                        paused = true;
                        self.set_phase(CrawlPhase::Paused);
                        self.sink.line("Paused");
                    }
                    continue;
                }
            };

            let Some(result) = result else {
                break;
            };
            let Some(mut outcome) = result else {
                continue;
            };

            completed += 1;
            self.checked.insert(url_key(&outcome.target_url));
            outcome.is_external = is_external(&outcome.target_url, &self.seed);

            self.sink.progress(completed, total);
            self.sink.outcome(&outcome);
            page_outcomes.push(outcome);
        }

        if paused && control.wait_while_paused().await {
            self.set_phase(CrawlPhase::Running);
            self.sink.line("Resumed");
        }

        if completed < total {
            tracing::info!("Stopped with {} of {} checks done on {}", completed, total, page_url);
        }

        self.outcomes.extend(page_outcomes.iter().cloned());
        page_outcomes
    }

    /// Returns true if a checked link should be crawled as a page
    fn is_crawlable(&self, outcome: &CheckOutcome) -> bool {
        !outcome.is_dead
            && !outcome.is_external
            && !has_non_html_extension(&outcome.target_url)
            && !self.visited.contains(&url_key(&outcome.target_url))
    }

    /// Handles stop and pause at a page boundary
    ///
    /// Returns false when the run should stop.
    async fn wait_for_gate(&mut self) -> bool {
        if self.control.is_stopped() {
            return false;
        }

        if self.control.is_paused() {
            self.set_phase(CrawlPhase::Paused);
            self.sink.line("Paused");

            if !self.control.wait_while_paused().await {
                return false;
            }

            self.set_phase(CrawlPhase::Running);
            self.sink.line("Resumed");
        }

        true
    }

    fn set_phase(&mut self, next: CrawlPhase) {
        if self.phase.can_transition_to(next) {
            tracing::debug!("Run phase {} -> {}", self.phase, next);
            self.phase = next;
            self.sink.phase(next);
        }
    }

    fn finish(mut self) -> CrawlRun {
        let phase = if self.control.is_stopped() {
            CrawlPhase::Stopped
        } else {
            CrawlPhase::Completed
        };
        self.set_phase(phase);

        tracing::info!(
            "Run {}: {} pages visited, {} assets checked",
            phase,
            self.visited.len(),
            self.outcomes.len()
        );
        self.sink.line(format!(
            "Crawling {}! Pages crawled: {}, total links checked: {}",
            phase,
            self.visited.len(),
            self.outcomes.len()
        ));

        CrawlRun {
            outcomes: self.outcomes,
            phase,
            pages_visited: self.visited.len(),
        }
    }
}

/// Dedup key for a URL; unparseable input keys on itself
fn url_key(url: &str) -> String {
    normalize_url(url).unwrap_or_else(|_| url.to_string())
}
