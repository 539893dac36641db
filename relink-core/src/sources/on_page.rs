use super::CandidateProducer;
use crate::model::{CandidateSource, RawCandidate};
use async_trait::async_trait;
use relink_scanner::html::find_redirect_signal;
use relink_scanner::{FetchResponse, PoliteClient, ScanError};
use tracing::debug;
use url::Url;

/// Redirect hints left on the original page itself: meta refresh, canonical
/// link, or a link following "this page has moved" wording.
pub struct OnPageSource;

#[async_trait]
impl CandidateProducer for OnPageSource {
    fn source(&self) -> CandidateSource {
        CandidateSource::OnPage
    }

    async fn produce(
        &self,
        original: &Url,
        client: &PoliteClient,
    ) -> Result<Vec<RawCandidate>, ScanError> {
        self.produce_with_page(original, None, client).await
    }

    async fn produce_with_page(
        &self,
        original: &Url,
        original_page: Option<&FetchResponse>,
        client: &PoliteClient,
    ) -> Result<Vec<RawCandidate>, ScanError> {
        // Error pages often carry the hint too, so any status with a body is inspected.
        let fetched;
        let page = match original_page {
            Some(page) => page,
            None => {
                fetched = client.get(original.as_str()).await?;
                &fetched
            }
        };
        Ok(redirect_candidates(original, page))
    }
}

fn redirect_candidates(original: &Url, page: &FetchResponse) -> Vec<RawCandidate> {
    if page.body.is_empty() || !page.is_html() {
        return Vec::new();
    }

    let base = Url::parse(&page.final_url).unwrap_or_else(|_| original.clone());
    find_redirect_signal(&page.body, &base)
        .map(|signal| {
            debug!("On-page signal at {}: {} -> {}", base, signal.describe(), signal.url());
            vec![
                RawCandidate::new(signal.url().as_str())
                    .with_reason(format!("{} on original page", signal.describe())),
            ]
        })
        .unwrap_or_default()
}
