//! Per-domain pacing and the robots.txt check.
//!
//! One [`PolitenessGate`] is shared by every fetch a resolver makes, so two
//! concurrent resolutions against the same host still respect the minimum
//! interval between requests. Requests to different hosts never wait on each
//! other: the domain map lock is only held long enough to look up the slot.

use crate::error::{Result, ScanError};
use crate::fetch::Fetch;
use crate::result::FetchResponse;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(500);
pub const MAX_FETCH_RETRIES: usize = 3;

const ROBOTS_TXT: &str = "/robots.txt";

/// Throttle key for a URL: host plus explicit port.
pub fn domain_key(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_ascii_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

type Slot = Arc<Mutex<Option<Instant>>>;

pub struct PolitenessGate {
    min_interval: Duration,
    last_request: StdMutex<HashMap<String, Slot>>,
}

impl PolitenessGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: StdMutex::new(HashMap::new()),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Number of distinct domains seen so far.
    pub fn tracked_domains(&self) -> usize {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Waits until `min_interval` has passed since the previous request to
    /// `domain`, then records the new request time.
    pub async fn acquire(&self, domain: &str) {
        let slot = {
            let mut map = self
                .last_request
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            map.entry(domain.to_ascii_lowercase()).or_default().clone()
        };

        // Held across the wait so same-domain callers queue up behind us.
        let mut last = slot.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + self.min_interval;
            if ready_at > Instant::now() {
                debug!("Throttling {} for {:?}", domain, ready_at - Instant::now());
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for PolitenessGate {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

/// A [`Fetch`] capability wrapped by a shared [`PolitenessGate`].
#[derive(Clone)]
pub struct PoliteClient {
    fetcher: Arc<dyn Fetch>,
    gate: Arc<PolitenessGate>,
    retries: usize,
}

impl PoliteClient {
    pub fn new(fetcher: Arc<dyn Fetch>, gate: Arc<PolitenessGate>) -> Self {
        Self {
            fetcher,
            gate,
            retries: 2,
        }
    }

    /// Retry count for [`PoliteClient::fetch_page`], capped at [`MAX_FETCH_RETRIES`].
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries.min(MAX_FETCH_RETRIES);
        self
    }

    pub fn gate(&self) -> &PolitenessGate {
        &self.gate
    }

    async fn throttle(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url)?;
        let domain = domain_key(&parsed)
            .ok_or_else(|| ScanError::InvalidUrl(format!("URL has no host: {}", url)))?;
        self.gate.acquire(&domain).await;
        Ok(())
    }

    pub async fn head(&self, url: &str) -> Result<FetchResponse> {
        self.throttle(url).await?;
        self.fetcher.head(url).await
    }

    pub async fn get(&self, url: &str) -> Result<FetchResponse> {
        self.throttle(url).await?;
        self.fetcher.get(url).await
    }

    /// Gated GET that retries transport timeouts a small fixed number of times.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchResponse> {
        let mut attempt = 0;
        loop {
            match self.get(url).await {
                Err(e) if e.is_timeout() && attempt < self.retries => {
                    attempt += 1;
                    warn!("Timeout fetching {} (retry {}/{})", url, attempt, self.retries);
                }
                other => return other,
            }
        }
    }

    /// Best-effort robots.txt check for the site hosting `origin`.
    ///
    /// Only a catch-all `Disallow: /` blocks crawling; any fetch problem or a
    /// missing file allows it. The file is fetched on every call.
    pub async fn is_crawl_allowed(&self, origin: &Url) -> bool {
        let Ok(robots_url) = origin.join(ROBOTS_TXT) else {
            return true;
        };

        match self.get(robots_url.as_str()).await {
            Ok(response) if response.status == 200 => {
                if robots_disallows_all(&response.body) {
                    info!("robots.txt disallows crawling {} ({})", origin, robots_url);
                    false
                } else {
                    true
                }
            }
            Ok(response) => {
                debug!("No robots.txt at {} (status {})", robots_url, response.status);
                true
            }
            Err(e) => {
                debug!("robots.txt fetch failed for {}: {}", robots_url, e);
                true
            }
        }
    }
}

/// True when a catch-all group (or rules preceding any `User-agent` line)
/// contains `Disallow: /`.
pub fn robots_disallows_all(body: &str) -> bool {
    let mut in_catch_all = true;
    let mut previous_was_agent = false;

    for raw in body.lines() {
        let line = raw.split('#').next().unwrap_or("").trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match key.trim().to_ascii_lowercase().as_str() {
            "user-agent" => {
                // Consecutive user-agent lines share one rule group.
                if !previous_was_agent {
                    in_catch_all = false;
                }
                if value == "*" {
                    in_catch_all = true;
                }
                previous_was_agent = true;
            }
            "disallow" => {
                previous_was_agent = false;
                if in_catch_all && value == "/" {
                    return true;
                }
            }
            _ => previous_was_agent = false,
        }
    }

    false
}
