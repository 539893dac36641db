use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Blocked by robots.txt: {0}")]
    PolicyBlocked(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ScanError {
    /// Transport-level timeouts are the only failures worth retrying.
    pub fn is_timeout(&self) -> bool {
        match self {
            ScanError::HttpError(e) => e.is_timeout(),
            ScanError::Timeout(_) => true,
            _ => false,
        }
    }
}

impl From<url::ParseError> for ScanError {
    fn from(e: url::ParseError) -> Self {
        ScanError::InvalidUrl(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
