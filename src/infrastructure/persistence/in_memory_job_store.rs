use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::application::ports::{JobFilter, JobMutator, JobRepository, RepositoryError};
use crate::domain::{JobId, JobSummary, ResearchJob};

/// Map-backed job store. The single `RwLock` makes every `update` atomic with
/// respect to concurrent readers: a reader sees the record either wholly
/// before or wholly after a mutation, never in between.
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, ResearchJob>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobStore {
    async fn create(&self, job: &ResearchJob) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<ResearchJob>, RepositoryError> {
        let jobs = self.jobs.read().await;
        Ok(jobs.get(&id).cloned())
    }

    async fn update(&self, id: JobId, mutator: JobMutator) -> Result<ResearchJob, RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        mutator(job)?;
        job.updated_at = Utc::now();
        Ok(job.clone())
    }

    async fn list(&self, filter: JobFilter) -> Result<Vec<JobSummary>, RepositoryError> {
        let jobs = self.jobs.read().await;
        let mut summaries: Vec<JobSummary> = jobs
            .values()
            .filter(|job| filter.status.map_or(true, |s| job.status == s))
            .map(JobSummary::from)
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .collect())
    }

    async fn delete(&self, id: JobId) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        jobs.remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }
}
