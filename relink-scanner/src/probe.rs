use crate::html::truncate_chars;
use crate::politeness::PoliteClient;
use crate::result::{FetchResponse, ProbeResult};
use crate::soft404::is_soft_404;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_SOFT404_PREFIX_CHARS: usize = 4000;

/// Liveness checks for single URLs. Every request goes through the politeness gate.
pub struct Prober {
    client: Arc<PoliteClient>,
    soft404_prefix_chars: usize,
}

impl Prober {
    pub fn new(client: Arc<PoliteClient>) -> Self {
        Self {
            client,
            soft404_prefix_chars: DEFAULT_SOFT404_PREFIX_CHARS,
        }
    }

    pub fn with_soft404_prefix_chars(mut self, chars: usize) -> Self {
        self.soft404_prefix_chars = chars;
        self
    }

    /// HEAD first; a 200 gets a follow-up GET for soft-404 classification.
    /// A failed HEAD falls back to one GET.
    pub async fn probe(&self, url: &str) -> ProbeResult {
        self.probe_page(url).await.0
    }

    /// Like [`probe`](Self::probe), also handing back the body when a GET was made.
    pub async fn probe_page(&self, url: &str) -> (ProbeResult, Option<FetchResponse>) {
        match self.client.head(url).await {
            Ok(head) if head.is_success() => {
                let mut result = Self::verdict(url, &head, true);
                if head.status != 200 {
                    return (result, None);
                }
                match self.client.get(url).await {
                    Ok(page) => {
                        self.classify_body(&mut result, &page);
                        (result, Some(page))
                    }
                    // The HEAD verdict stands when the follow-up GET fails.
                    Err(e) => {
                        debug!("Soft-404 check skipped for {}: {}", url, e);
                        (result, None)
                    }
                }
            }
            Ok(head) if matches!(head.status, 401 | 403) => {
                let mut result = Self::verdict(url, &head, false);
                result.error = Some(format!(
                    "HTTP {}: authorization required (manual review)",
                    head.status
                ));
                (result, None)
            }
            // Servers that reject HEAD get the same GET fallback as transport failures.
            Ok(head) if matches!(head.status, 405 | 501) => {
                debug!("HEAD not supported by {} ({})", url, head.status);
                self.probe_with_get(url).await
            }
            Ok(head) => (Self::verdict(url, &head, false), None),
            Err(e) => {
                debug!("HEAD failed for {}: {}", url, e);
                self.probe_with_get(url).await
            }
        }
    }

    async fn probe_with_get(&self, url: &str) -> (ProbeResult, Option<FetchResponse>) {
        match self.client.get(url).await {
            Ok(page) => {
                let mut result = Self::verdict(url, &page, page.is_success());
                if matches!(page.status, 401 | 403) {
                    result.error = Some(format!(
                        "HTTP {}: authorization required (manual review)",
                        page.status
                    ));
                }
                self.classify_body(&mut result, &page);
                (result, Some(page))
            }
            Err(e) => (ProbeResult::with_error(url.to_string(), e.to_string()), None),
        }
    }

    fn verdict(url: &str, response: &FetchResponse, is_live: bool) -> ProbeResult {
        let mut result = ProbeResult::new(url.to_string());
        result.http_status = Some(response.status);
        result.final_url = Some(response.final_url.clone());
        result.is_live = is_live;
        result
    }

    /// Only a 200 body is classified; the GET status overrides a HEAD that disagreed.
    fn classify_body(&self, result: &mut ProbeResult, page: &FetchResponse) {
        result.http_status = Some(page.status);
        result.final_url = Some(page.final_url.clone());
        if page.status != 200 {
            result.is_live = page.is_success();
            return;
        }
        if is_soft_404(truncate_chars(&page.body, self.soft404_prefix_chars)) {
            debug!("Soft-404 detected at {}", page.final_url);
            result.is_live = false;
            result.is_soft_404 = true;
        }
    }
}
