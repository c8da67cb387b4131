use serde::{Deserialize, Serialize};

/// Cross-jurisdiction comparison for one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    pub topic: String,
    pub jurisdictions_compared: Vec<String>,
    /// Similarity of the compared regimes, clamped to `[0, 1]`.
    pub similarity_score: f64,
    #[serde(default)]
    pub similarities: Vec<String>,
    #[serde(default)]
    pub differences: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
}

impl Comparison {
    pub fn new(topic: impl Into<String>, jurisdictions_compared: Vec<String>) -> Self {
        Self {
            topic: topic.into(),
            jurisdictions_compared,
            similarity_score: 0.0,
            similarities: Vec::new(),
            differences: Vec::new(),
            gaps: Vec::new(),
        }
    }

    pub fn with_similarity_score(mut self, score: f64) -> Self {
        self.similarity_score = score.clamp(0.0, 1.0);
        self
    }
}
