//! Candidate producers. Each one proposes raw replacement URLs for a dead
//! original; failures are returned, never thrown, and the resolver treats a
//! failed source as contributing nothing.

mod crawl;
mod heuristic;
mod on_page;
mod parent;
mod sitemap;

pub use crawl::CrawlSource;
pub use heuristic::{HeuristicSource, slug_variants};
pub use on_page::OnPageSource;
pub use parent::{ParentPathSource, parent_paths};
pub use sitemap::{SitemapSource, parse_sitemap_locs};

use crate::config::ResolverConfig;
use crate::model::{CandidateSource, RawCandidate};
use async_trait::async_trait;
use relink_scanner::{FetchResponse, PoliteClient, ScanError};
use url::Url;

#[async_trait]
pub trait CandidateProducer: Send + Sync {
    fn source(&self) -> CandidateSource;

    async fn produce(
        &self,
        original: &Url,
        client: &PoliteClient,
    ) -> Result<Vec<RawCandidate>, ScanError>;

    /// Called by the resolver with the body the liveness probe already
    /// fetched for `original`, if any.
    async fn produce_with_page(
        &self,
        original: &Url,
        _original_page: Option<&FetchResponse>,
        client: &PoliteClient,
    ) -> Result<Vec<RawCandidate>, ScanError> {
        self.produce(original, client).await
    }
}

/// All five producers in source-priority order.
pub fn default_producers(config: &ResolverConfig) -> Vec<Box<dyn CandidateProducer>> {
    vec![
        Box::new(SitemapSource::new(config.max_sitemap_entries)),
        Box::new(OnPageSource),
        Box::new(ParentPathSource::new(config.parent_depth)),
        Box::new(CrawlSource::from_config(config)),
        Box::new(HeuristicSource),
    ]
}

/// `scheme://host[:port]` of a URL, without a trailing slash.
pub(crate) fn site_root(url: &Url) -> &str {
    &url[..url::Position::BeforePath]
}
