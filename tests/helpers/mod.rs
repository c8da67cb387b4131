#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;

use policyscope::application::ports::{
    CapabilityError, ClausesByTopic, ComparisonCapability, ExtractionCapability, JobFilter,
    JobMutator, JobRepository, RepositoryError, SearchCapability, SummaryCapability,
};
use policyscope::application::services::PipelineController;
use policyscope::domain::{
    ClauseType, Comparison, Document, ExtractedClause, JobId, JobSummary, ResearchJob,
    ResearchRequest, Summary,
};
use policyscope::infrastructure::persistence::InMemoryJobStore;

pub fn sample_request() -> ResearchRequest {
    ResearchRequest::new("Compare AI safety regulations in EU vs US")
        .with_regions(vec!["EU".to_string(), "US".to_string()])
        .with_max_documents(10)
}

pub fn sample_documents() -> Vec<Document> {
    vec![
        Document::new(
            "EU AI Act",
            "https://europa.eu/ai-act",
            "High-risk AI systems must undergo conformity assessment.",
            "European Commission",
        )
        .with_region("EU"),
        Document::new(
            "US Executive Order on AI",
            "https://whitehouse.gov/ai-eo",
            "Agencies shall develop guidelines for safe AI deployment.",
            "White House",
        )
        .with_region("US"),
    ]
}

pub fn clause(
    topic: &str,
    jurisdiction: &str,
    text: &str,
    document_source: &str,
) -> ExtractedClause {
    ExtractedClause {
        clause_text: text.to_string(),
        clause_type: ClauseType::Requirement,
        topic: topic.to_string(),
        jurisdiction: jurisdiction.to_string(),
        document_source: document_source.to_string(),
        key_entities: Vec::new(),
    }
}

/// Search capability returning a fixed document set.
pub struct StaticSearch {
    pub documents: Vec<Document>,
}

#[async_trait]
impl SearchCapability for StaticSearch {
    async fn find(&self, _request: &ResearchRequest) -> Result<Vec<Document>, CapabilityError> {
        Ok(self.documents.clone())
    }
}

pub struct FailingSearch;

#[async_trait]
impl SearchCapability for FailingSearch {
    async fn find(&self, _request: &ResearchRequest) -> Result<Vec<Document>, CapabilityError> {
        Err(CapabilityError::Unreachable(
            "search api unreachable".to_string(),
        ))
    }
}

/// Extraction capability keyed by document title. Titles with no entry yield
/// no clauses; titles listed in `failing_titles` fail outright.
pub struct StaticExtraction {
    pub clauses_by_title: HashMap<String, Vec<ExtractedClause>>,
    pub failing_titles: Vec<String>,
}

impl StaticExtraction {
    pub fn new(clauses_by_title: HashMap<String, Vec<ExtractedClause>>) -> Self {
        Self {
            clauses_by_title,
            failing_titles: Vec::new(),
        }
    }
}

#[async_trait]
impl ExtractionCapability for StaticExtraction {
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractedClause>, CapabilityError> {
        if self.failing_titles.contains(&document.title) {
            return Err(CapabilityError::RequestFailed(format!(
                "extraction failed for {}",
                document.title
            )));
        }
        Ok(self
            .clauses_by_title
            .get(&document.title)
            .cloned()
            .unwrap_or_default())
    }
}

pub struct FailingExtraction;

#[async_trait]
impl ExtractionCapability for FailingExtraction {
    async fn extract(&self, _document: &Document) -> Result<Vec<ExtractedClause>, CapabilityError> {
        Err(CapabilityError::Unreachable(
            "extraction model unreachable".to_string(),
        ))
    }
}

/// Deterministic comparison: one record per topic handed over, scoring 0.5.
pub struct HeuristicComparison;

#[async_trait]
impl ComparisonCapability for HeuristicComparison {
    async fn compare(
        &self,
        clauses_by_topic: &ClausesByTopic,
    ) -> Result<Vec<Comparison>, CapabilityError> {
        Ok(clauses_by_topic
            .iter()
            .map(|(topic, by_jurisdiction)| {
                let jurisdictions: Vec<String> = by_jurisdiction.keys().cloned().collect();
                let mut comparison =
                    Comparison::new(topic.clone(), jurisdictions).with_similarity_score(0.5);
                comparison
                    .differences
                    .push(format!("Approaches to {} differ in stringency", topic));
                comparison
            })
            .collect())
    }
}

pub struct StaticSummary;

#[async_trait]
impl SummaryCapability for StaticSummary {
    async fn summarize(
        &self,
        query: &str,
        comparisons: &[Comparison],
    ) -> Result<Summary, CapabilityError> {
        Ok(Summary {
            executive_summary: format!(
                "Findings for '{}' across {} compared topics.",
                query,
                comparisons.len()
            ),
            key_findings: vec!["Regulatory stringency varies across jurisdictions".to_string()],
            recommendations: vec!["Harmonize assessment requirements".to_string()],
            methodology: "test pipeline".to_string(),
            limitations: Vec::new(),
            generated_at: Utc::now(),
        })
    }
}

pub struct FailingSummary;

#[async_trait]
impl SummaryCapability for FailingSummary {
    async fn summarize(
        &self,
        _query: &str,
        _comparisons: &[Comparison],
    ) -> Result<Summary, CapabilityError> {
        Err(CapabilityError::Unreachable(
            "summary model unreachable".to_string(),
        ))
    }
}

/// Store whose every operation fails, for exercising storage-failure paths.
pub struct BrokenJobStore;

impl BrokenJobStore {
    fn error() -> RepositoryError {
        RepositoryError::QueryFailed("connection pool exhausted".to_string())
    }
}

#[async_trait]
impl JobRepository for BrokenJobStore {
    async fn create(&self, _job: &ResearchJob) -> Result<(), RepositoryError> {
        Err(Self::error())
    }

    async fn get_by_id(&self, _id: JobId) -> Result<Option<ResearchJob>, RepositoryError> {
        Err(Self::error())
    }

    async fn update(
        &self,
        _id: JobId,
        _mutator: JobMutator,
    ) -> Result<ResearchJob, RepositoryError> {
        Err(Self::error())
    }

    async fn list(&self, _filter: JobFilter) -> Result<Vec<JobSummary>, RepositoryError> {
        Err(Self::error())
    }

    async fn delete(&self, _id: JobId) -> Result<(), RepositoryError> {
        Err(Self::error())
    }
}

/// Controller wired to the in-memory store and the standard happy-path mocks,
/// with per-capability overrides.
pub struct TestPipeline {
    pub repository: Arc<dyn JobRepository>,
    pub controller: PipelineController,
}

pub fn happy_extraction() -> StaticExtraction {
    let mut clauses_by_title = HashMap::new();
    clauses_by_title.insert(
        "EU AI Act".to_string(),
        vec![clause(
            "safety",
            "EU",
            "High-risk AI systems must undergo conformity assessment",
            "EU AI Act",
        )],
    );
    clauses_by_title.insert(
        "US Executive Order on AI".to_string(),
        vec![clause(
            "safety",
            "US",
            "Agencies shall develop guidelines for safe AI deployment",
            "US Executive Order on AI",
        )],
    );
    StaticExtraction::new(clauses_by_title)
}

pub fn pipeline_with(
    search: Arc<dyn SearchCapability>,
    extraction: Arc<dyn ExtractionCapability>,
    comparison: Arc<dyn ComparisonCapability>,
    summary: Arc<dyn SummaryCapability>,
) -> TestPipeline {
    let repository: Arc<dyn JobRepository> = Arc::new(InMemoryJobStore::new());
    let controller = PipelineController::new(
        Arc::clone(&repository),
        search,
        extraction,
        comparison,
        summary,
    );
    TestPipeline {
        repository,
        controller,
    }
}

pub fn happy_pipeline() -> TestPipeline {
    pipeline_with(
        Arc::new(StaticSearch {
            documents: sample_documents(),
        }),
        Arc::new(happy_extraction()),
        Arc::new(HeuristicComparison),
        Arc::new(StaticSummary),
    )
}
