use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ports::{
    ClausesByTopic, ComparisonCapability, ExtractionCapability, SearchCapability, SummaryCapability,
};
use crate::domain::{Comparison, Document, ExtractedClause, ResearchRequest, Stage, Summary};

/// Terminal failure of one stage. Carries the stage name so the job's error
/// message says where the run stopped.
#[derive(Debug, thiserror::Error)]
#[error("{stage} stage failed: {message}")]
pub struct StageFailure {
    pub stage: Stage,
    pub message: String,
}

impl StageFailure {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

/// Receives fractional progress while a stage runs. Reporting is best-effort;
/// implementations must not fail the stage.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, stage: Stage, fraction: f64);
}

/// Sink for callers that do not track progress (mostly tests).
pub struct NoopProgressSink;

#[async_trait]
impl ProgressSink for NoopProgressSink {
    async fn report(&self, _stage: Stage, _fraction: f64) {}
}

pub struct SearchStage {
    capability: Arc<dyn SearchCapability>,
}

impl SearchStage {
    pub fn new(capability: Arc<dyn SearchCapability>) -> Self {
        Self { capability }
    }

    /// Zero discovered documents is a successful empty result, not a failure.
    pub async fn execute(
        &self,
        request: &ResearchRequest,
        progress: &dyn ProgressSink,
    ) -> Result<Vec<Document>, StageFailure> {
        progress.report(Stage::Search, 0.0).await;

        let mut documents = self
            .capability
            .find(request)
            .await
            .map_err(|e| StageFailure::new(Stage::Search, e.to_string()))?;

        documents.truncate(request.max_documents);

        tracing::info!(count = documents.len(), "Search stage finished");
        Ok(documents)
    }
}

pub struct ExtractStage {
    capability: Arc<dyn ExtractionCapability>,
}

impl ExtractStage {
    pub fn new(capability: Arc<dyn ExtractionCapability>) -> Self {
        Self { capability }
    }

    /// Extracts per document, skipping documents whose extraction fails.
    /// The stage itself fails only when at least one document was given,
    /// at least one extraction failed, and no clauses came out at all.
    pub async fn execute(
        &self,
        documents: &[Document],
        progress: &dyn ProgressSink,
    ) -> Result<Vec<ExtractedClause>, StageFailure> {
        progress.report(Stage::Extract, 0.0).await;

        let total = documents.len();
        let mut clauses = Vec::new();
        let mut failed_documents = 0;

        for (index, document) in documents.iter().enumerate() {
            match self.capability.extract(document).await {
                Ok(mut extracted) => {
                    tracing::debug!(
                        document = %document.title,
                        clauses = extracted.len(),
                        "Document extracted"
                    );
                    clauses.append(&mut extracted);
                }
                Err(e) => {
                    failed_documents += 1;
                    tracing::warn!(
                        document = %document.title,
                        error = %e,
                        "Skipping document after extraction failure"
                    );
                }
            }
            // Mid-stage fractions stay below 1.0: a full progress entry must
            // only ever appear together with the recorded output.
            progress
                .report(Stage::Extract, (index + 1) as f64 / (total + 1) as f64)
                .await;
        }

        if total > 0 && failed_documents > 0 && clauses.is_empty() {
            return Err(StageFailure::new(
                Stage::Extract,
                format!("no clauses extracted: all {failed_documents} document extractions failed"),
            ));
        }

        tracing::info!(
            clauses = clauses.len(),
            skipped_documents = failed_documents,
            "Extract stage finished"
        );
        Ok(clauses)
    }
}

pub struct CompareStage {
    capability: Arc<dyn ComparisonCapability>,
}

impl CompareStage {
    pub fn new(capability: Arc<dyn ComparisonCapability>) -> Self {
        Self { capability }
    }

    /// Groups clauses by topic and jurisdiction, then compares only topics
    /// represented in at least two jurisdictions. Single-jurisdiction topics
    /// are dropped silently.
    pub async fn execute(
        &self,
        clauses: &[ExtractedClause],
        progress: &dyn ProgressSink,
    ) -> Result<Vec<Comparison>, StageFailure> {
        progress.report(Stage::Compare, 0.0).await;

        let grouped = group_clauses_by_topic(clauses);
        let total_topics = grouped.len();
        let comparable: ClausesByTopic = grouped
            .into_iter()
            .filter(|(_, by_jurisdiction)| by_jurisdiction.len() >= 2)
            .collect();

        tracing::debug!(
            topics = total_topics,
            comparable = comparable.len(),
            "Grouped clauses for comparison"
        );

        if comparable.is_empty() {
            tracing::info!("Compare stage finished: no topic spans multiple jurisdictions");
            return Ok(Vec::new());
        }

        let comparisons = self
            .capability
            .compare(&comparable)
            .await
            .map_err(|e| StageFailure::new(Stage::Compare, e.to_string()))?;

        tracing::info!(comparisons = comparisons.len(), "Compare stage finished");
        Ok(comparisons)
    }
}

pub(crate) fn group_clauses_by_topic(clauses: &[ExtractedClause]) -> ClausesByTopic {
    let mut grouped = ClausesByTopic::new();
    for clause in clauses {
        grouped
            .entry(clause.topic.to_lowercase())
            .or_default()
            .entry(clause.jurisdiction.clone())
            .or_default()
            .push(clause.clone());
    }
    grouped
}

pub struct SummarizeStage {
    capability: Arc<dyn SummaryCapability>,
}

impl SummarizeStage {
    pub fn new(capability: Arc<dyn SummaryCapability>) -> Self {
        Self { capability }
    }

    pub async fn execute(
        &self,
        query: &str,
        comparisons: &[Comparison],
        progress: &dyn ProgressSink,
    ) -> Result<Summary, StageFailure> {
        progress.report(Stage::Summarize, 0.0).await;

        let summary = self
            .capability
            .summarize(query, comparisons)
            .await
            .map_err(|e| StageFailure::new(Stage::Summarize, e.to_string()))?;

        tracing::info!("Summarize stage finished");
        Ok(summary)
    }
}
