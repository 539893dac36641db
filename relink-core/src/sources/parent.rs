use super::{CandidateProducer, site_root};
use crate::model::{CandidateSource, RawCandidate};
use async_trait::async_trait;
use relink_scanner::{PoliteClient, ScanError};
use url::Url;

/// Directory URLs above the original, nearest first, ending at the site root.
pub fn parent_paths(url: &Url, max_levels: usize) -> Vec<String> {
    let parts: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    if parts.is_empty() {
        return Vec::new();
    }

    let root = site_root(url);
    let mut candidates: Vec<String> = (1..=parts.len().min(max_levels))
        .map(|dropped| {
            let kept = &parts[..parts.len() - dropped];
            if kept.is_empty() {
                format!("{}/", root)
            } else {
                format!("{}/{}/", root, kept.join("/"))
            }
        })
        .collect();

    let root_url = format!("{}/", root);
    if candidates.last() != Some(&root_url) {
        candidates.push(root_url);
    }
    candidates
}

pub struct ParentPathSource {
    max_levels: usize,
}

impl ParentPathSource {
    pub fn new(max_levels: usize) -> Self {
        Self { max_levels }
    }
}

#[async_trait]
impl CandidateProducer for ParentPathSource {
    fn source(&self) -> CandidateSource {
        CandidateSource::Parent
    }

    async fn produce(
        &self,
        original: &Url,
        _client: &PoliteClient,
    ) -> Result<Vec<RawCandidate>, ScanError> {
        Ok(parent_paths(original, self.max_levels)
            .into_iter()
            .map(RawCandidate::new)
            .collect())
    }
}
