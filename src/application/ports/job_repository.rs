use async_trait::async_trait;

use crate::domain::{JobId, JobStateError, JobStatus, JobSummary, ResearchJob};

use super::RepositoryError;

/// Mutation applied to a job under the store's atomicity guarantee. Returning
/// an error leaves the stored record untouched.
pub type JobMutator = Box<dyn FnOnce(&mut ResearchJob) -> Result<(), JobStateError> + Send>;

#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Concurrency-safe persistence for job records.
///
/// `update` is the only mutation path after creation: it must apply the
/// mutator atomically so that a concurrent reader observes either the whole
/// pre-update record or the whole post-update record, never a mix.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &ResearchJob) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<ResearchJob>, RepositoryError>;

    async fn update(&self, id: JobId, mutator: JobMutator) -> Result<ResearchJob, RepositoryError>;

    /// Summaries, newest first.
    async fn list(&self, filter: JobFilter) -> Result<Vec<JobSummary>, RepositoryError>;

    async fn delete(&self, id: JobId) -> Result<(), RepositoryError>;
}
