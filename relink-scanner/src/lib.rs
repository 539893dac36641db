pub mod crawler;
pub mod error;
pub mod fetch;
pub mod html;
pub mod politeness;
pub mod probe;
pub mod result;
pub mod soft404;

pub use crawler::Crawler;
pub use error::ScanError;
pub use fetch::{Fetch, HttpFetcher};
pub use politeness::{PoliteClient, PolitenessGate, domain_key};
pub use probe::Prober;
pub use result::{CrawledPage, FetchResponse, ProbeResult};
pub use soft404::is_soft_404;
