mod capability_error;
mod comparison_capability;
mod extraction_capability;
mod job_repository;
mod repository_error;
mod search_capability;
mod summary_capability;

pub use capability_error::CapabilityError;
pub use comparison_capability::{ClausesByTopic, ComparisonCapability};
pub use extraction_capability::ExtractionCapability;
pub use job_repository::{JobFilter, JobMutator, JobRepository};
pub use repository_error::RepositoryError;
pub use search_capability::SearchCapability;
pub use summary_capability::SummaryCapability;
