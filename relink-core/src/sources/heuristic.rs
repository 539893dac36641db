use super::{CandidateProducer, site_root};
use crate::model::{CandidateSource, RawCandidate};
use async_trait::async_trait;
use relink_scanner::{PoliteClient, ScanError};
use url::Url;

const SLUG_SUFFIXES: &[&str] = &["-latest", "-new", "-updated", "-1"];

/// Synthetic `{slug}{suffix}` URLs at the site root.
pub fn slug_variants(url: &Url) -> Vec<String> {
    let Some(slug) = url
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
    else {
        return Vec::new();
    };

    let root = site_root(url);
    SLUG_SUFFIXES
        .iter()
        .map(|suffix| format!("{}/{}{}", root, slug, suffix))
        .collect()
}

pub struct HeuristicSource;

#[async_trait]
impl CandidateProducer for HeuristicSource {
    fn source(&self) -> CandidateSource {
        CandidateSource::Heuristic
    }

    async fn produce(
        &self,
        original: &Url,
        _client: &PoliteClient,
    ) -> Result<Vec<RawCandidate>, ScanError> {
        Ok(slug_variants(original)
            .into_iter()
            .map(RawCandidate::new)
            .collect())
    }
}
