use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{JobId, ResearchJob, ResearchRequest};

use super::worker::PipelineMessage;

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("query must not be empty")]
    EmptyQuery,
    #[error("storage failure: {0}")]
    Storage(#[from] RepositoryError),
    #[error("pipeline worker unavailable")]
    WorkerUnavailable,
}

/// Accepts a research request, creates the pending job record, and enqueues
/// execution. Returns the new id without waiting for any stage. The record is
/// never touched again by this service after hand-off.
pub struct SubmissionService {
    repository: Arc<dyn JobRepository>,
    sender: mpsc::Sender<PipelineMessage>,
}

impl SubmissionService {
    pub fn new(repository: Arc<dyn JobRepository>, sender: mpsc::Sender<PipelineMessage>) -> Self {
        Self { repository, sender }
    }

    pub async fn submit(&self, request: ResearchRequest) -> Result<JobId, SubmitError> {
        if request.query.trim().is_empty() {
            return Err(SubmitError::EmptyQuery);
        }

        let job = ResearchJob::new(request);
        let job_id = job.id;
        self.repository.create(&job).await?;

        self.sender
            .send(PipelineMessage { job_id })
            .await
            .map_err(|_| SubmitError::WorkerUnavailable)?;

        tracing::info!(job_id = %job_id, "Research job submitted");
        Ok(job_id)
    }
}
