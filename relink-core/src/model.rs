use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy that proposed a candidate. Declaration order is the ranking
/// tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Original,
    Sitemap,
    OnPage,
    Parent,
    Crawl,
    Heuristic,
}

impl CandidateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateSource::Original => "original",
            CandidateSource::Sitemap => "sitemap",
            CandidateSource::OnPage => "on_page",
            CandidateSource::Parent => "parent",
            CandidateSource::Crawl => "crawl",
            CandidateSource::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub url: String,
    pub source: CandidateSource,
    pub score: u8,
    pub reason: String,
}

impl Candidate {
    pub fn new(url: impl Into<String>, source: CandidateSource, score: u8, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source,
            score: score.min(100),
            reason: reason.into(),
        }
    }
}

/// What a source yields before scoring. Crawl results carry the page text
/// they were accepted with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCandidate {
    pub url: String,
    pub page_text: Option<String>,
    pub reason: Option<String>,
}

impl RawCandidate {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            page_text: None,
            reason: None,
        }
    }

    pub fn with_page_text(mut self, text: impl Into<String>) -> Self {
        self.page_text = Some(text.into());
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    Working,
    AlternativeFound,
    NotFound,
    Error,
}

impl ResolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStatus::Working => "working",
            ResolutionStatus::AlternativeFound => "alternative_found",
            ResolutionStatus::NotFound => "not_found",
            ResolutionStatus::Error => "error",
        }
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub original_url: String,
    pub status: ResolutionStatus,
    pub top_alternative: Option<String>,
    pub candidates: Vec<Candidate>,
    pub error: Option<String>,
}

impl ResolutionResult {
    pub fn working(original_url: String, candidate: Candidate) -> Self {
        Self {
            original_url,
            status: ResolutionStatus::Working,
            top_alternative: Some(candidate.url.clone()),
            candidates: vec![candidate],
            error: None,
        }
    }

    /// `AlternativeFound` when any candidate survived ranking, otherwise `NotFound`.
    pub fn ranked(original_url: String, candidates: Vec<Candidate>) -> Self {
        let top_alternative = candidates.first().map(|c| c.url.clone());
        let status = if candidates.is_empty() {
            ResolutionStatus::NotFound
        } else {
            ResolutionStatus::AlternativeFound
        };
        Self {
            original_url,
            status,
            top_alternative,
            candidates,
            error: None,
        }
    }

    pub fn with_error(original_url: String, error: String) -> Self {
        Self {
            original_url,
            status: ResolutionStatus::Error,
            top_alternative: None,
            candidates: Vec::new(),
            error: Some(error),
        }
    }
}
