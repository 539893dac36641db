use serde::{Deserialize, Serialize};

/// One HEAD or GET exchange as seen by the rest of the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub status: u16,
    pub final_url: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, final_url: impl Into<String>) -> Self {
        Self {
            status,
            final_url: final_url.into(),
            content_type: None,
            body: String::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status)
    }

    /// Missing content types are treated as HTML; plenty of small sites omit the header.
    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_ascii_lowercase().contains("html"))
            .unwrap_or(true)
    }
}

/// Liveness verdict for a single URL. Produced fresh by every probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub url: String,
    pub http_status: Option<u16>,
    pub is_live: bool,
    pub is_soft_404: bool,
    pub final_url: Option<String>,
    pub error: Option<String>,
}

impl ProbeResult {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http_status: None,
            is_live: false,
            is_soft_404: false,
            final_url: None,
            error: None,
        }
    }

    pub fn with_error(url: String, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(url)
        }
    }
}

/// A page accepted by the bounded crawl: fetched with 200 and not a soft-404.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    pub depth: usize,
    pub text_snippet: String,
    pub links_found: usize,
    /// Links this page added to the frontier; the rest were known or over the queue cap.
    pub links_queued: usize,
}
