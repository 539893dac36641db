use relink_scanner::ScanError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    /// Rejected before any network access.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
