use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;
use std::sync::Arc;

use crate::application::ports::{JobFilter, JobRepository, RepositoryError};
use crate::domain::{JobId, JobStatus, JobSummary, ResearchJob, StageProgress};

#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("storage failure: {0}")]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ReadError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(id) => ReadError::NotFound(id),
            other => ReadError::Storage(other),
        }
    }
}

/// Cheap polling payload.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub id: JobId,
    pub status: JobStatus,
    pub progress: StageProgress,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a result fetch. A still-running job is not an error.
#[derive(Debug)]
pub enum ResultOutcome {
    Ready(Box<ResearchJob>),
    NotReady {
        status: JobStatus,
        progress: StageProgress,
    },
    Failed {
        error_message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON round-trippable back into the full record.
    Structured,
    /// Human-readable markdown report.
    Text,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "structured" | "json" => Ok(ExportFormat::Structured),
            "text" | "markdown" => Ok(ExportFormat::Text),
            other => Err(format!("Unsupported export format: {}", other)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("job {0} is not completed")]
    NotCompleted(JobId),
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Read-only queries against the job store: polling, final retrieval, listing,
/// deletion, and export of completed records.
pub struct ResearchReader {
    repository: Arc<dyn JobRepository>,
}

impl ResearchReader {
    pub fn new(repository: Arc<dyn JobRepository>) -> Self {
        Self { repository }
    }

    pub async fn status(&self, id: JobId) -> Result<StatusView, ReadError> {
        let job = self.fetch(id).await?;
        Ok(StatusView {
            id: job.id,
            status: job.status,
            progress: job.progress,
            error_message: job.error_message,
            created_at: job.created_at,
            updated_at: job.updated_at,
        })
    }

    pub async fn result(&self, id: JobId) -> Result<ResultOutcome, ReadError> {
        let job = self.fetch(id).await?;
        match job.status {
            JobStatus::Completed => Ok(ResultOutcome::Ready(Box::new(job))),
            JobStatus::Failed => Ok(ResultOutcome::Failed {
                error_message: job
                    .error_message
                    .unwrap_or_else(|| "unknown failure".to_string()),
            }),
            JobStatus::Pending | JobStatus::Running => Ok(ResultOutcome::NotReady {
                status: job.status,
                progress: job.progress,
            }),
        }
    }

    pub async fn list(&self, filter: JobFilter) -> Result<Vec<JobSummary>, ReadError> {
        Ok(self.repository.list(filter).await?)
    }

    pub async fn delete(&self, id: JobId) -> Result<(), ReadError> {
        Ok(self.repository.delete(id).await?)
    }

    /// Serializes a completed record. Non-completed jobs are refused.
    pub async fn export(&self, id: JobId, format: ExportFormat) -> Result<String, ExportError> {
        let job = self.fetch(id).await?;
        if job.status != JobStatus::Completed {
            return Err(ExportError::NotCompleted(id));
        }
        match format {
            ExportFormat::Structured => serde_json::to_string_pretty(&job)
                .map_err(|e| ExportError::Serialization(e.to_string())),
            ExportFormat::Text => Ok(markdown_report(&job)),
        }
    }

    async fn fetch(&self, id: JobId) -> Result<ResearchJob, ReadError> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ReadError::NotFound(id))
    }
}

fn markdown_report(job: &ResearchJob) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Policy Research Report\n");
    let _ = writeln!(out, "## Query\n{}\n", job.request.query);

    if let Some(summary) = &job.outputs.summarize {
        let _ = writeln!(out, "## Executive Summary\n{}\n", summary.executive_summary);

        let _ = writeln!(out, "## Key Findings");
        for (i, finding) in summary.key_findings.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, finding);
        }

        let _ = writeln!(out, "\n## Recommendations");
        for (i, recommendation) in summary.recommendations.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, recommendation);
        }
        let _ = writeln!(out);
    }

    if let Some(documents) = &job.outputs.search {
        let _ = writeln!(out, "## Documents Analyzed");
        for doc in documents {
            let region = doc.region.as_deref().unwrap_or("unknown region");
            let _ = writeln!(out, "- **{}** ({}) - {}", doc.title, doc.source, region);
        }
        let _ = writeln!(out);
    }

    if let Some(clauses) = &job.outputs.extract {
        let _ = writeln!(out, "## Extracted Clauses");
        for clause in clauses {
            let excerpt: String = clause.clause_text.chars().take(200).collect();
            let _ = writeln!(
                out,
                "- **{}** ({}): {}",
                clause.topic, clause.jurisdiction, excerpt
            );
        }
        let _ = writeln!(out);
    }

    if let Some(comparisons) = &job.outputs.compare {
        let _ = writeln!(out, "## Comparative Analysis");
        for comparison in comparisons {
            let _ = writeln!(out, "\n### {}", comparison.topic);
            let _ = writeln!(
                out,
                "Jurisdictions: {}",
                comparison.jurisdictions_compared.join(", ")
            );
            let _ = writeln!(out, "Similarity score: {:.2}", comparison.similarity_score);

            if !comparison.similarities.is_empty() {
                let _ = writeln!(out, "\n**Similarities:**");
                for item in &comparison.similarities {
                    let _ = writeln!(out, "- {}", item);
                }
            }
            if !comparison.differences.is_empty() {
                let _ = writeln!(out, "\n**Differences:**");
                for item in &comparison.differences {
                    let _ = writeln!(out, "- {}", item);
                }
            }
            if !comparison.gaps.is_empty() {
                let _ = writeln!(out, "\n**Regulatory Gaps:**");
                for item in &comparison.gaps {
                    let _ = writeln!(out, "- {}", item);
                }
            }
        }
        let _ = writeln!(out);
    }

    if let Some(summary) = &job.outputs.summarize {
        if !summary.methodology.is_empty() {
            let _ = writeln!(out, "## Methodology\n{}\n", summary.methodology);
        }
        if !summary.limitations.is_empty() {
            let _ = writeln!(out, "## Limitations");
            for limitation in &summary.limitations {
                let _ = writeln!(out, "- {}", limitation);
            }
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(
        out,
        "---\n*Report generated on {}*",
        job.updated_at.to_rfc3339()
    );

    out
}
