use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Final synthesis produced by the summarize stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub executive_summary: String,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub methodology: String,
    #[serde(default)]
    pub limitations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl Summary {
    pub fn new(executive_summary: impl Into<String>) -> Self {
        Self {
            executive_summary: executive_summary.into(),
            key_findings: Vec::new(),
            recommendations: Vec::new(),
            methodology: String::new(),
            limitations: Vec::new(),
            generated_at: Utc::now(),
        }
    }
}
