use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::application::ports::{CapabilityError, ClausesByTopic, ComparisonCapability};
use crate::domain::{Comparison, ExtractedClause};

use super::ollama_client::{extract_json_block, OllamaClient};

/// Clauses sent to the model per jurisdiction; keeps prompts bounded.
const CLAUSES_PER_JURISDICTION: usize = 3;

pub struct OllamaComparison {
    client: Arc<OllamaClient>,
}

#[derive(Deserialize)]
struct RawComparison {
    #[serde(default)]
    similarities: Vec<String>,
    #[serde(default)]
    differences: Vec<String>,
    #[serde(default)]
    gaps: Vec<String>,
    #[serde(default)]
    similarity_score: f64,
}

impl OllamaComparison {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }

    fn build_prompt(topic: &str, by_jurisdiction: &BTreeMap<String, Vec<ExtractedClause>>) -> String {
        let mut context = String::new();
        for (jurisdiction, clauses) in by_jurisdiction {
            let _ = writeln!(context, "\n=== {} ===", jurisdiction);
            for (i, clause) in clauses.iter().take(CLAUSES_PER_JURISDICTION).enumerate() {
                let _ = writeln!(context, "{}. {}", i + 1, clause.clause_text);
            }
        }

        format!(
            r#"You are a legal expert specializing in comparative policy analysis. Compare the following clauses across jurisdictions for the topic: {topic}.

{context}

Analyze similarities, differences, and regulatory gaps. Respond with JSON only:
{{
  "similarities": ["..."],
  "differences": ["..."],
  "gaps": ["..."],
  "similarity_score": 0.5
}}"#,
        )
    }

    async fn compare_topic(
        &self,
        topic: &str,
        by_jurisdiction: &BTreeMap<String, Vec<ExtractedClause>>,
    ) -> Result<Comparison, CapabilityError> {
        let prompt = Self::build_prompt(topic, by_jurisdiction);
        let response = self.client.generate(&prompt).await?;

        let raw: RawComparison = serde_json::from_str(extract_json_block(&response))
            .map_err(|e| CapabilityError::InvalidResponse(e.to_string()))?;

        let jurisdictions = by_jurisdiction.keys().cloned().collect();
        let mut comparison =
            Comparison::new(topic, jurisdictions).with_similarity_score(raw.similarity_score);
        comparison.similarities = raw.similarities;
        comparison.differences = raw.differences;
        comparison.gaps = raw.gaps;
        Ok(comparison)
    }
}

#[async_trait]
impl ComparisonCapability for OllamaComparison {
    /// Compares each topic in turn. A malformed model answer drops that topic
    /// only; transport-level failures abort the whole call.
    async fn compare(
        &self,
        clauses_by_topic: &ClausesByTopic,
    ) -> Result<Vec<Comparison>, CapabilityError> {
        let mut comparisons = Vec::new();

        for (topic, by_jurisdiction) in clauses_by_topic {
            match self.compare_topic(topic, by_jurisdiction).await {
                Ok(comparison) => comparisons.push(comparison),
                Err(CapabilityError::InvalidResponse(msg)) => {
                    tracing::warn!(topic = %topic, error = %msg, "Dropping topic: unparseable comparison");
                }
                Err(other) => return Err(other),
            }
        }

        Ok(comparisons)
    }
}
