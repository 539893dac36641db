use relink_scanner::crawler::{DEFAULT_MAX_PAGES, DEFAULT_QUEUE_FACTOR, DEFAULT_SNIPPET_CHARS};
use relink_scanner::fetch::DEFAULT_USER_AGENT;
use relink_scanner::politeness::{DEFAULT_MIN_INTERVAL, MAX_FETCH_RETRIES};
use relink_scanner::probe::DEFAULT_SOFT404_PREFIX_CHARS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MAX_CANDIDATES: usize = 12;
pub const DEFAULT_PARENT_DEPTH: usize = 3;
pub const DEFAULT_BULK_CONCURRENCY: usize = 5;
pub const DEFAULT_MAX_SITEMAP_ENTRIES: usize = 5000;
pub const DEFAULT_VERIFY_PROBE_FACTOR: usize = 3;

/// Tunables for a [`Resolver`](crate::resolve::Resolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Minimum gap between two requests to the same host.
    pub min_interval: Duration,
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
    pub user_agent: String,
    pub max_candidates: usize,
    pub max_crawl_pages: usize,
    pub crawl_queue_factor: usize,
    pub parent_depth: usize,
    pub soft404_prefix_chars: usize,
    pub page_snippet_chars: usize,
    /// Timeout retries for page fetches, at most 3.
    pub fetch_retries: usize,
    pub bulk_concurrency: usize,
    pub max_sitemap_entries: usize,
    /// Probe ranked candidates and drop the dead ones.
    pub verify_candidates: bool,
    /// Verification probes allowed per resolution, as a multiple of `max_candidates`.
    pub verify_probe_factor: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_interval: DEFAULT_MIN_INTERVAL,
            request_timeout: Duration::from_secs(10),
            max_body_bytes: 2 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_crawl_pages: DEFAULT_MAX_PAGES,
            crawl_queue_factor: DEFAULT_QUEUE_FACTOR,
            parent_depth: DEFAULT_PARENT_DEPTH,
            soft404_prefix_chars: DEFAULT_SOFT404_PREFIX_CHARS,
            page_snippet_chars: DEFAULT_SNIPPET_CHARS,
            fetch_retries: 2,
            bulk_concurrency: DEFAULT_BULK_CONCURRENCY,
            max_sitemap_entries: DEFAULT_MAX_SITEMAP_ENTRIES,
            verify_candidates: false,
            verify_probe_factor: DEFAULT_VERIFY_PROBE_FACTOR,
        }
    }
}

impl ResolverConfig {
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    pub fn with_max_crawl_pages(mut self, pages: usize) -> Self {
        self.max_crawl_pages = pages;
        self
    }

    pub fn with_parent_depth(mut self, depth: usize) -> Self {
        self.parent_depth = depth;
        self
    }

    pub fn with_fetch_retries(mut self, retries: usize) -> Self {
        self.fetch_retries = retries.min(MAX_FETCH_RETRIES);
        self
    }

    pub fn with_bulk_concurrency(mut self, workers: usize) -> Self {
        self.bulk_concurrency = workers.max(1);
        self
    }

    pub fn with_verify_candidates(mut self, verify: bool) -> Self {
        self.verify_candidates = verify;
        self
    }

    pub fn with_verify_probe_factor(mut self, factor: usize) -> Self {
        self.verify_probe_factor = factor.max(1);
        self
    }

    pub fn max_verify_probes(&self) -> usize {
        self.max_candidates.saturating_mul(self.verify_probe_factor.max(1))
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
