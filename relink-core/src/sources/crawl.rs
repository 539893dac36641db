use super::CandidateProducer;
use crate::config::ResolverConfig;
use crate::model::{CandidateSource, RawCandidate};
use async_trait::async_trait;
use relink_scanner::{Crawler, PoliteClient, ScanError};
use std::sync::Arc;
use url::Url;

/// Nearby live pages found by a bounded same-site crawl from the original URL.
pub struct CrawlSource {
    max_pages: usize,
    queue_factor: usize,
    snippet_chars: usize,
}

impl CrawlSource {
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            max_pages: config.max_crawl_pages,
            queue_factor: config.crawl_queue_factor,
            snippet_chars: config.page_snippet_chars,
        }
    }
}

#[async_trait]
impl CandidateProducer for CrawlSource {
    fn source(&self) -> CandidateSource {
        CandidateSource::Crawl
    }

    async fn produce(
        &self,
        original: &Url,
        client: &PoliteClient,
    ) -> Result<Vec<RawCandidate>, ScanError> {
        let crawler = Crawler::new(Arc::new(client.clone()))
            .with_max_pages(self.max_pages)
            .with_queue_factor(self.queue_factor)
            .with_snippet_chars(self.snippet_chars);

        let pages = crawler.crawl(original).await?;
        Ok(pages
            .into_iter()
            .map(|page| {
                RawCandidate::new(page.url)
                    .with_page_text(page.text_snippet)
                    .with_reason(format!("nearby internal page (depth {})", page.depth))
            })
            .collect())
    }
}
