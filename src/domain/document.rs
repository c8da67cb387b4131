use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A policy document discovered by the search stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub url: String,
    pub content: String,
    pub source: String,
    pub region: Option<String>,
    pub document_type: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub relevance_score: Option<f64>,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            source: source.into(),
            region: None,
            document_type: None,
            published_date: None,
            relevance_score: None,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}
