pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod report;
pub mod resolve;
pub mod score;
pub mod sources;

pub use config::ResolverConfig;
pub use error::ResolveError;
pub use model::{Candidate, CandidateSource, ResolutionResult, ResolutionStatus};
pub use normalize::normalize_url;
pub use resolve::Resolver;
