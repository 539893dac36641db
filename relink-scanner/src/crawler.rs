use crate::error::{Result, ScanError};
use crate::html::{extract_links, is_same_site, truncate_chars, visible_text};
use crate::politeness::PoliteClient;
use crate::result::CrawledPage;
use crate::soft404::is_soft_404;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

pub const DEFAULT_MAX_PAGES: usize = 10;
pub const DEFAULT_QUEUE_FACTOR: usize = 3;
pub const DEFAULT_SNIPPET_CHARS: usize = 2000;

/// Breadth-first, same-site crawl bounded by a page budget.
///
/// Every fetch counts against the budget whether or not the page is accepted,
/// and the pending queue never holds more than `queue_factor × max_pages` URLs.
pub struct Crawler {
    client: Arc<PoliteClient>,
    max_pages: usize,
    queue_factor: usize,
    snippet_chars: usize,
}

impl Crawler {
    pub fn new(client: Arc<PoliteClient>) -> Self {
        Self {
            client,
            max_pages: DEFAULT_MAX_PAGES,
            queue_factor: DEFAULT_QUEUE_FACTOR,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_queue_factor(mut self, factor: usize) -> Self {
        self.queue_factor = factor.max(1);
        self
    }

    pub fn with_snippet_chars(mut self, chars: usize) -> Self {
        self.snippet_chars = chars;
        self
    }

    pub fn queue_capacity(&self) -> usize {
        self.max_pages * self.queue_factor
    }

    /// Pages reachable from `start_url` that load with 200 and real content.
    ///
    /// Fails with [`ScanError::PolicyBlocked`] when robots.txt forbids crawling.
    pub async fn crawl(&self, start_url: &Url) -> Result<Vec<CrawledPage>> {
        if !self.client.is_crawl_allowed(start_url).await {
            return Err(ScanError::PolicyBlocked(start_url.to_string()));
        }

        info!(
            "Starting crawl of {} (budget {} pages)",
            start_url, self.max_pages
        );

        let mut start = start_url.clone();
        start.set_fragment(None);

        let queue_cap = self.queue_capacity();
        let mut queue: VecDeque<(Url, usize)> = VecDeque::from([(start.clone(), 0)]);
        let mut seen: HashSet<String> = HashSet::from([start.to_string()]);
        let mut discovered = Vec::new();
        let mut fetched = 0;

        while fetched < self.max_pages {
            let Some((url, depth)) = queue.pop_front() else {
                break;
            };
            fetched += 1;

            let page = match self.client.get(url.as_str()).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Crawl error for {}: {}", url, e);
                    continue;
                }
            };

            if page.status != 200 || is_soft_404(&page.body) {
                debug!("Rejected {} (status {})", url, page.status);
                continue;
            }

            // Redirects may land somewhere else; links resolve against the final URL.
            let final_url = Url::parse(&page.final_url).unwrap_or_else(|_| url.clone());
            if !is_same_site(&final_url, &start) {
                debug!("{} redirected off-site to {}", url, final_url);
                continue;
            }
            if final_url != url && !seen.insert(final_url.to_string()) {
                continue;
            }

            let links = if page.is_html() {
                extract_links(&page.body, &final_url)
                    .into_iter()
                    .filter(|link| is_same_site(link, &start))
                    .collect()
            } else {
                Vec::new()
            };

            let mut links_queued = 0;
            for link in &links {
                if queue.len() >= queue_cap {
                    debug!("Queue full at {}; dropping remaining links from {}", queue_cap, final_url);
                    break;
                }
                if seen.insert(link.to_string()) {
                    debug!("Queuing {} (depth {})", link, depth + 1);
                    queue.push_back((link.clone(), depth + 1));
                    links_queued += 1;
                }
            }

            let text = visible_text(&page.body);
            discovered.push(CrawledPage {
                url: final_url.to_string(),
                depth,
                text_snippet: truncate_chars(&text, self.snippet_chars).to_string(),
                links_found: links.len(),
                links_queued,
            });
        }

        info!(
            "Crawl of {} complete. Fetched {} pages, accepted {}",
            start_url,
            fetched,
            discovered.len()
        );
        Ok(discovered)
    }
}
