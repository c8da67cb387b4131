use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{
    ComparisonCapability, ExtractionCapability, JobMutator, JobRepository, RepositoryError,
    SearchCapability, SummaryCapability,
};
use crate::domain::{
    Comparison, Document, ExtractedClause, JobId, JobStateError, JobStatus, ResearchJob, Stage,
};

use super::stages::{
    CompareStage, ExtractStage, ProgressSink, SearchStage, StageFailure, SummarizeStage,
};

/// Pipeline execution states. `Failed` is absorbing; `Done` and `Failed` are
/// terminal. The transition function is pure so it can be tested without any
/// runtime machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Running(Stage),
    Done,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Succeeded,
    Failed,
}

impl PipelineState {
    /// Idle enters the first stage; any other state is unchanged.
    pub fn begin(self) -> PipelineState {
        match self {
            PipelineState::Idle => PipelineState::Running(Stage::first()),
            other => other,
        }
    }

    pub fn advance(self, outcome: StageOutcome) -> PipelineState {
        match (self, outcome) {
            (PipelineState::Running(_), StageOutcome::Failed) => PipelineState::Failed,
            (PipelineState::Running(stage), StageOutcome::Succeeded) => match stage.next() {
                Some(next) => PipelineState::Running(next),
                None => PipelineState::Done,
            },
            (other, _) => other,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    /// The record was not pending when the run tried to claim it. Guarantees
    /// at most one active run per job id.
    #[error("job {id} cannot start: status is {status}")]
    AlreadyStarted { id: JobId, status: JobStatus },
    #[error("storage failure: {0}")]
    Storage(RepositoryError),
}

/// Drives the four stages in dependency order against one job record,
/// persisting each stage's output and progress before the next stage starts.
pub struct PipelineController {
    repository: Arc<dyn JobRepository>,
    search: SearchStage,
    extract: ExtractStage,
    compare: CompareStage,
    summarize: SummarizeStage,
    stage_timeout: Option<Duration>,
}

impl PipelineController {
    pub fn new(
        repository: Arc<dyn JobRepository>,
        search: Arc<dyn SearchCapability>,
        extraction: Arc<dyn ExtractionCapability>,
        comparison: Arc<dyn ComparisonCapability>,
        summary: Arc<dyn SummaryCapability>,
    ) -> Self {
        Self {
            repository,
            search: SearchStage::new(search),
            extract: ExtractStage::new(extraction),
            compare: CompareStage::new(comparison),
            summarize: SummarizeStage::new(summary),
            stage_timeout: None,
        }
    }

    /// Wall-clock budget applied to each stage invocation; expiry is treated
    /// as a failure of the running stage.
    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = Some(timeout);
        self
    }

    /// Runs the job to a terminal status. Returns the terminal status, or an
    /// error if the job could not be claimed or the store became unavailable.
    #[tracing::instrument(skip(self), fields(job_id = %job_id))]
    pub async fn run(&self, job_id: JobId) -> Result<JobStatus, PipelineError> {
        let claimed = self
            .repository
            .update(job_id, Box::new(|job| job.start()))
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(id) => PipelineError::NotFound(id),
                RepositoryError::InvalidTransition(JobStateError::NotPending(status)) => {
                    PipelineError::AlreadyStarted { id: job_id, status }
                }
                other => PipelineError::Storage(other),
            })?;

        tracing::info!(query = %claimed.request.query, "Pipeline run started");

        let sink = RepositoryProgressSink {
            repository: Arc::clone(&self.repository),
            job_id,
        };

        let mut handoff = StageHandoff::new(claimed);
        let mut state = PipelineState::Idle.begin();

        while let PipelineState::Running(stage) = state {
            let outcome = self.run_stage(stage, job_id, &mut handoff, &sink).await?;
            state = state.advance(outcome);
        }

        if state == PipelineState::Done {
            self.repository
                .update(job_id, Box::new(|job| job.complete()))
                .await
                .map_err(PipelineError::Storage)?;
            tracing::info!("Pipeline run completed");
            Ok(JobStatus::Completed)
        } else {
            tracing::warn!("Pipeline run failed");
            Ok(JobStatus::Failed)
        }
    }

    /// Executes one stage, persists its output on success or the terminal
    /// failure on error, and reports the outcome to the state machine.
    async fn run_stage(
        &self,
        stage: Stage,
        job_id: JobId,
        handoff: &mut StageHandoff,
        sink: &RepositoryProgressSink,
    ) -> Result<StageOutcome, PipelineError> {
        let attempt: Result<JobMutator, StageFailure> = match stage {
            Stage::Search => self
                .bounded(stage, self.search.execute(&handoff.request, sink))
                .await
                .map(|documents| {
                    handoff.documents = documents.clone();
                    Box::new(move |job: &mut ResearchJob| job.record_search_output(documents))
                        as JobMutator
                }),
            Stage::Extract => self
                .bounded(stage, self.extract.execute(&handoff.documents, sink))
                .await
                .map(|clauses| {
                    handoff.clauses = clauses.clone();
                    Box::new(move |job: &mut ResearchJob| job.record_extract_output(clauses))
                        as JobMutator
                }),
            Stage::Compare => self
                .bounded(stage, self.compare.execute(&handoff.clauses, sink))
                .await
                .map(|comparisons| {
                    handoff.comparisons = comparisons.clone();
                    Box::new(move |job: &mut ResearchJob| job.record_compare_output(comparisons))
                        as JobMutator
                }),
            Stage::Summarize => self
                .bounded(
                    stage,
                    self.summarize
                        .execute(&handoff.request.query, &handoff.comparisons, sink),
                )
                .await
                .map(|summary| {
                    Box::new(move |job: &mut ResearchJob| job.record_summary_output(summary))
                        as JobMutator
                }),
        };

        match attempt {
            Ok(mutator) => {
                self.repository
                    .update(job_id, mutator)
                    .await
                    .map_err(PipelineError::Storage)?;
                Ok(StageOutcome::Succeeded)
            }
            Err(failure) => {
                tracing::error!(stage = %stage, error = %failure, "Stage failed, aborting run");
                let message = failure.to_string();
                self.repository
                    .update(job_id, Box::new(move |job| job.fail(message)))
                    .await
                    .map_err(PipelineError::Storage)?;
                Ok(StageOutcome::Failed)
            }
        }
    }

    async fn bounded<T>(
        &self,
        stage: Stage,
        fut: impl std::future::Future<Output = Result<T, StageFailure>>,
    ) -> Result<T, StageFailure> {
        match self.stage_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => Err(StageFailure::new(
                    stage,
                    format!("exceeded wall-clock budget of {}s", limit.as_secs()),
                )),
            },
            None => fut.await,
        }
    }
}

/// Typed stage-to-stage handoff for one run. Each slot is filled exactly when
/// the producing stage succeeds.
struct StageHandoff {
    request: crate::domain::ResearchRequest,
    documents: Vec<Document>,
    clauses: Vec<ExtractedClause>,
    comparisons: Vec<Comparison>,
}

impl StageHandoff {
    fn new(job: ResearchJob) -> Self {
        Self {
            request: job.request,
            documents: Vec::new(),
            clauses: Vec::new(),
            comparisons: Vec::new(),
        }
    }
}

/// Writes fractional progress through the store's atomic update. Failures are
/// logged and swallowed: losing a progress tick must not fail the stage.
struct RepositoryProgressSink {
    repository: Arc<dyn JobRepository>,
    job_id: JobId,
}

#[async_trait]
impl ProgressSink for RepositoryProgressSink {
    async fn report(&self, stage: Stage, fraction: f64) {
        let result = self
            .repository
            .update(
                self.job_id,
                Box::new(move |job| job.advance_progress(stage, fraction)),
            )
            .await;
        if let Err(e) = result {
            tracing::warn!(stage = %stage, error = %e, "Failed to persist progress update");
        }
    }
}
