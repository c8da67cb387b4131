use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Comparison, Document, ExtractedClause, JobId, JobStatus, ResearchRequest, Stage, Summary};

/// Fractional completion per stage. Entries only move forward within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageProgress {
    pub search: f64,
    pub extract: f64,
    pub compare: f64,
    pub summarize: f64,
}

impl StageProgress {
    pub fn new() -> Self {
        Self {
            search: 0.0,
            extract: 0.0,
            compare: 0.0,
            summarize: 0.0,
        }
    }

    pub fn get(&self, stage: Stage) -> f64 {
        match stage {
            Stage::Search => self.search,
            Stage::Extract => self.extract,
            Stage::Compare => self.compare,
            Stage::Summarize => self.summarize,
        }
    }

    /// Moves a stage's fraction forward. Values below the current one are
    /// ignored so concurrent observers never see progress decrease.
    pub fn advance(&mut self, stage: Stage, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        let slot = match stage {
            Stage::Search => &mut self.search,
            Stage::Extract => &mut self.extract,
            Stage::Compare => &mut self.compare,
            Stage::Summarize => &mut self.summarize,
        };
        if fraction > *slot {
            *slot = fraction;
        }
    }

    pub fn is_all_complete(&self) -> bool {
        Stage::ALL.iter().all(|s| self.get(*s) >= 1.0)
    }
}

impl Default for StageProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-stage artifacts, populated as stages complete. A slot is never
/// overwritten once written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageOutputs {
    pub search: Option<Vec<Document>>,
    pub extract: Option<Vec<ExtractedClause>>,
    pub compare: Option<Vec<Comparison>>,
    pub summarize: Option<Summary>,
}

impl StageOutputs {
    pub fn is_written(&self, stage: Stage) -> bool {
        match stage {
            Stage::Search => self.search.is_some(),
            Stage::Extract => self.extract.is_some(),
            Stage::Compare => self.compare.is_some(),
            Stage::Summarize => self.summarize.is_some(),
        }
    }

    pub fn is_complete(&self) -> bool {
        Stage::ALL.iter().all(|s| self.is_written(*s))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum JobStateError {
    #[error("job is not pending (status: {0})")]
    NotPending(JobStatus),
    #[error("job is not running (status: {0})")]
    NotRunning(JobStatus),
    #[error("job already reached terminal status {0}")]
    Terminal(JobStatus),
    #[error("output for stage {0} already written")]
    OutputAlreadyWritten(Stage),
    #[error("cannot complete job: not all stage outputs are written")]
    IncompleteOutputs,
}

/// The durable state of one submitted research request.
///
/// All transitions go through the methods below so that the status machine
/// (pending -> running -> completed | failed) and the write-once discipline
/// for stage outputs hold no matter which store the record lives in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchJob {
    pub id: JobId,
    pub request: ResearchRequest,
    pub status: JobStatus,
    pub progress: StageProgress,
    pub outputs: StageOutputs,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResearchJob {
    pub fn new(request: ResearchRequest) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            request,
            status: JobStatus::Pending,
            progress: StageProgress::new(),
            outputs: StageOutputs::default(),
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Claims the job for execution. Only a pending job may start, which is
    /// what makes a second concurrent run against the same id impossible when
    /// called under the store's atomic update.
    pub fn start(&mut self) -> Result<(), JobStateError> {
        match self.status {
            JobStatus::Pending => {
                self.status = JobStatus::Running;
                Ok(())
            }
            other => Err(JobStateError::NotPending(other)),
        }
    }

    pub fn advance_progress(&mut self, stage: Stage, fraction: f64) -> Result<(), JobStateError> {
        if self.status != JobStatus::Running {
            return Err(JobStateError::NotRunning(self.status));
        }
        self.progress.advance(stage, fraction);
        Ok(())
    }

    pub fn record_search_output(&mut self, documents: Vec<Document>) -> Result<(), JobStateError> {
        self.check_writable(Stage::Search)?;
        self.outputs.search = Some(documents);
        self.progress.advance(Stage::Search, 1.0);
        Ok(())
    }

    pub fn record_extract_output(
        &mut self,
        clauses: Vec<ExtractedClause>,
    ) -> Result<(), JobStateError> {
        self.check_writable(Stage::Extract)?;
        self.outputs.extract = Some(clauses);
        self.progress.advance(Stage::Extract, 1.0);
        Ok(())
    }

    pub fn record_compare_output(
        &mut self,
        comparisons: Vec<Comparison>,
    ) -> Result<(), JobStateError> {
        self.check_writable(Stage::Compare)?;
        self.outputs.compare = Some(comparisons);
        self.progress.advance(Stage::Compare, 1.0);
        Ok(())
    }

    pub fn record_summary_output(&mut self, summary: Summary) -> Result<(), JobStateError> {
        self.check_writable(Stage::Summarize)?;
        self.outputs.summarize = Some(summary);
        self.progress.advance(Stage::Summarize, 1.0);
        Ok(())
    }

    /// Terminal success. Requires every stage output to be present.
    pub fn complete(&mut self) -> Result<(), JobStateError> {
        if self.status != JobStatus::Running {
            return Err(JobStateError::NotRunning(self.status));
        }
        if !self.outputs.is_complete() {
            return Err(JobStateError::IncompleteOutputs);
        }
        self.status = JobStatus::Completed;
        Ok(())
    }

    /// Terminal failure. Outputs of already-completed stages stay in place.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), JobStateError> {
        if self.status.is_terminal() {
            return Err(JobStateError::Terminal(self.status));
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(message.into());
        Ok(())
    }

    fn check_writable(&self, stage: Stage) -> Result<(), JobStateError> {
        if self.status != JobStatus::Running {
            return Err(JobStateError::NotRunning(self.status));
        }
        if self.outputs.is_written(stage) {
            return Err(JobStateError::OutputAlreadyWritten(stage));
        }
        Ok(())
    }
}

/// Lightweight listing view of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: JobId,
    pub query: String,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&ResearchJob> for JobSummary {
    fn from(job: &ResearchJob) -> Self {
        Self {
            id: job.id,
            query: job.request.query.clone(),
            status: job.status,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}
