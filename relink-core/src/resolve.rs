//! Resolution orchestrator.
//!
//! ```text
//! START -> PROBE_ORIGINAL -> WORKING
//!                         -> GENERATE_CANDIDATES -> SCORE_AND_DEDUPE -> RANK_AND_CAP
//! (any stage) -> ERROR
//! ```
//!
//! [`Resolver::resolve_single`] never fails: invalid input, internal errors and
//! panics all come back as a [`ResolutionResult`] with `status = error`.

use crate::config::ResolverConfig;
use crate::error::{ResolveError, Result};
use crate::model::{Candidate, CandidateSource, RawCandidate, ResolutionResult};
use crate::normalize::{normalize_url, parse_normalized};
use crate::score::{base_tokens, score};
use crate::sources::{CandidateProducer, default_producers, site_root};
use futures::{FutureExt, StreamExt, stream};
use relink_scanner::html::{truncate_chars, visible_text};
use relink_scanner::{
    Fetch, FetchResponse, HttpFetcher, PoliteClient, PolitenessGate, Prober, ScanError, is_soft_404,
};
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use url::Url;

/// Called once per finished bulk entry with its input index.
pub type BulkProgressCallback = Arc<dyn Fn(usize, &ResolutionResult) + Send + Sync>;

pub struct Resolver {
    config: ResolverConfig,
    client: Arc<PoliteClient>,
    prober: Prober,
    producers: Vec<Box<dyn CandidateProducer>>,
}

impl Resolver {
    /// Resolver backed by a real HTTP client.
    pub fn new(config: ResolverConfig) -> Result<Self> {
        let fetcher = HttpFetcher::with_options(
            config.request_timeout,
            &config.user_agent,
            config.max_body_bytes,
        )?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher)))
    }

    pub fn with_fetcher(config: ResolverConfig, fetcher: Arc<dyn Fetch>) -> Self {
        let gate = Arc::new(PolitenessGate::new(config.min_interval));
        Self::with_gate(config, fetcher, gate)
    }

    /// Shares `gate` with whoever else holds it, so pacing spans resolvers.
    pub fn with_gate(
        config: ResolverConfig,
        fetcher: Arc<dyn Fetch>,
        gate: Arc<PolitenessGate>,
    ) -> Self {
        let client =
            Arc::new(PoliteClient::new(fetcher, gate).with_retries(config.fetch_retries));
        let prober = Prober::new(client.clone())
            .with_soft404_prefix_chars(config.soft404_prefix_chars);
        let producers = default_producers(&config);

        Self {
            config,
            client,
            prober,
            producers,
        }
    }

    /// Replace the candidate sources. They run in the order given.
    pub fn with_producers(mut self, producers: Vec<Box<dyn CandidateProducer>>) -> Self {
        self.producers = producers;
        self
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn gate(&self) -> &PolitenessGate {
        self.client.gate()
    }

    pub async fn resolve_single(&self, raw_url: &str) -> ResolutionResult {
        let original_url = raw_url.trim().to_string();

        match AssertUnwindSafe(self.try_resolve(raw_url)).catch_unwind().await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => {
                warn!("Resolution of '{}' failed: {}", original_url, e);
                ResolutionResult::with_error(original_url, e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("Resolution of '{}' panicked: {}", original_url, message);
                ResolutionResult::with_error(original_url, ResolveError::Internal(message).to_string())
            }
        }
    }

    /// One result per input, in input order. Blank entries keep their slot and
    /// come back as errors without touching the network.
    pub async fn resolve_bulk<S>(&self, raw_urls: &[S]) -> Vec<ResolutionResult>
    where
        S: AsRef<str>,
    {
        self.resolve_bulk_with_progress(raw_urls, None).await
    }

    pub async fn resolve_bulk_with_progress<S>(
        &self,
        raw_urls: &[S],
        progress: Option<BulkProgressCallback>,
    ) -> Vec<ResolutionResult>
    where
        S: AsRef<str>,
    {
        let workers = self.config.bulk_concurrency.max(1);
        info!("Resolving {} URLs with {} workers", raw_urls.len(), workers);

        stream::iter(raw_urls.iter().enumerate())
            .map(|(idx, raw)| {
                let progress = progress.clone();
                async move {
                    let result = self.resolve_single(raw.as_ref()).await;
                    if let Some(callback) = progress {
                        callback(idx, &result);
                    }
                    result
                }
            })
            .buffered(workers)
            .collect()
            .await
    }

    async fn try_resolve(&self, raw_url: &str) -> Result<ResolutionResult> {
        let original_url = raw_url.trim().to_string();
        let url = parse_normalized(raw_url)?;

        let (probe, original_page) = self.prober.probe_page(url.as_str()).await;
        if probe.is_live {
            let reason = match probe.final_url.as_deref() {
                Some(final_url) if final_url != url.as_str() => {
                    format!("original works (redirects to {})", final_url)
                }
                _ => "original works".to_string(),
            };
            info!("{} is live", url);
            let candidate = Candidate::new(url.as_str(), CandidateSource::Original, 100, reason);
            return Ok(ResolutionResult::working(original_url, candidate));
        }

        if probe.http_status.is_none() && !self.host_reachable(&url).await {
            // Every source targets this host; with no HTTP answer at all none can help.
            let message = probe
                .error
                .unwrap_or_else(|| "no response from host".to_string());
            info!("{} is unreachable: {}", url, message);
            let mut result = ResolutionResult::ranked(original_url, Vec::new());
            result.error = Some(message);
            return Ok(result);
        }

        debug!(
            "{} is not live (status {:?}, soft-404 {})",
            url, probe.http_status, probe.is_soft_404
        );

        let candidates = self.generate_and_score(&url, original_page.as_ref()).await;
        let candidates = self.rank_and_cap(candidates).await;

        info!("{}: {} candidates", url, candidates.len());
        Ok(ResolutionResult::ranked(original_url, candidates))
    }

    /// Whether the original's host answers at all, judged by its site root.
    async fn host_reachable(&self, url: &Url) -> bool {
        let root = format!("{}/", site_root(url));
        if root == url.as_str() {
            return false;
        }
        match self.client.head(&root).await {
            Ok(response) => {
                debug!("{} answered {}; only the original path failed", root, response.status);
                true
            }
            Err(e) => {
                debug!("{} is unreachable too: {}", root, e);
                false
            }
        }
    }

    async fn generate_and_score(
        &self,
        url: &Url,
        original_page: Option<&FetchResponse>,
    ) -> Vec<Candidate> {
        let tokens = base_tokens(url);
        let mut seen: HashSet<String> = candidate_key(url.as_str()).into_iter().collect();
        let mut candidates = Vec::new();

        for producer in &self.producers {
            let source = producer.source();
            let produced = producer
                .produce_with_page(url, original_page, &self.client)
                .await;
            let raw_candidates = match produced {
                Ok(raw_candidates) => raw_candidates,
                Err(ScanError::PolicyBlocked(target)) => {
                    info!("{} source skipped: robots.txt disallows {}", source, target);
                    continue;
                }
                Err(e) => {
                    warn!("{} source failed for {}: {}", source, url, e);
                    continue;
                }
            };
            debug!("{} source proposed {} URLs", source, raw_candidates.len());

            for raw in raw_candidates {
                let Some(key) = candidate_key(&raw.url) else {
                    debug!("Dropping unusable candidate '{}'", raw.url);
                    continue;
                };
                if !seen.insert(key.clone()) {
                    continue;
                }
                candidates.push(self.score_candidate(&tokens, key, source, raw).await);
            }
        }

        candidates
    }

    async fn score_candidate(
        &self,
        tokens: &[String],
        url: String,
        source: CandidateSource,
        raw: RawCandidate,
    ) -> Candidate {
        let page_text = match (source, raw.page_text) {
            (CandidateSource::Crawl, None) => self.page_snippet(&url).await,
            (CandidateSource::Crawl, text) => text,
            _ => None,
        };
        let score = score(tokens, &url, page_text.as_deref());
        let reason = raw
            .reason
            .unwrap_or_else(|| default_reason(source).to_string());
        Candidate::new(url, source, score, reason)
    }

    /// Visible text of a live page, for text-overlap scoring. Failures yield nothing.
    async fn page_snippet(&self, url: &str) -> Option<String> {
        match self.client.fetch_page(url).await {
            Ok(page) if page.status == 200 && !is_soft_404(&page.body) => {
                let text = visible_text(&page.body);
                Some(truncate_chars(&text, self.config.page_snippet_chars).to_string())
            }
            Ok(_) => None,
            Err(e) => {
                debug!("Snippet fetch failed for {}: {}", url, e);
                None
            }
        }
    }

    async fn rank_and_cap(&self, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
        rank(&mut candidates);

        if !self.config.verify_candidates {
            candidates.truncate(self.config.max_candidates);
            return candidates;
        }

        let max_probes = self.config.max_verify_probes();
        let mut probes = 0;
        let mut verified = Vec::new();
        for candidate in candidates {
            if verified.len() >= self.config.max_candidates {
                break;
            }
            // Crawl results were already fetched live.
            if candidate.source == CandidateSource::Crawl {
                verified.push(candidate);
                continue;
            }
            if probes >= max_probes {
                debug!("Verification budget of {} probes spent", max_probes);
                continue;
            }
            probes += 1;
            if self.prober.probe(&candidate.url).await.is_live {
                verified.push(candidate);
            } else {
                debug!("Dropping dead candidate {}", candidate.url);
            }
        }
        verified
    }
}

/// Score descending, then source priority; the sort is stable so discovery
/// order breaks the remaining ties.
pub fn rank(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| b.score.cmp(&a.score).then(a.source.cmp(&b.source)));
}

/// Canonical identity of a candidate URL, or `None` if it is not fetchable.
fn candidate_key(raw: &str) -> Option<String> {
    let mut url = Url::parse(&normalize_url(raw)).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}

fn default_reason(source: CandidateSource) -> &'static str {
    match source {
        CandidateSource::Original => "original works",
        CandidateSource::Sitemap => "from sitemap",
        CandidateSource::OnPage => "on-page redirect signal",
        CandidateSource::Parent => "parent path heuristic",
        CandidateSource::Crawl => "nearby internal page",
        CandidateSource::Heuristic => "slug heuristic",
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
