use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;

use crate::application::ports::{CapabilityError, SummaryCapability};
use crate::domain::{Comparison, Summary};

use super::ollama_client::{extract_json_block, OllamaClient};

const METHODOLOGY: &str = "Automated four-stage pipeline: document search, clause \
extraction, cross-jurisdiction comparison, and synthesis by a language model.";

pub struct OllamaSummary {
    client: Arc<OllamaClient>,
}

#[derive(Deserialize)]
struct RawSummary {
    executive_summary: String,
    #[serde(default)]
    key_findings: Vec<String>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default)]
    limitations: Vec<String>,
}

impl OllamaSummary {
    pub fn new(client: Arc<OllamaClient>) -> Self {
        Self { client }
    }

    fn build_prompt(query: &str, comparisons: &[Comparison]) -> String {
        let mut digest = String::new();
        for comparison in comparisons {
            let _ = writeln!(
                digest,
                "- {} ({}; similarity {:.2}): {} similarities, {} differences, {} gaps",
                comparison.topic,
                comparison.jurisdictions_compared.join(" vs "),
                comparison.similarity_score,
                comparison.similarities.len(),
                comparison.differences.len(),
                comparison.gaps.len(),
            );
            for difference in &comparison.differences {
                let _ = writeln!(digest, "  difference: {}", difference);
            }
            for gap in &comparison.gaps {
                let _ = writeln!(digest, "  gap: {}", gap);
            }
        }

        format!(
            r#"You are a senior policy analyst. Write an executive summary and recommendations for the research question below.

RESEARCH QUESTION: {query}

COMPARATIVE ANALYSIS:
{digest}

Respond with JSON only:
{{
  "executive_summary": "...",
  "key_findings": ["..."],
  "recommendations": ["..."],
  "limitations": ["..."]
}}"#,
        )
    }
}

#[async_trait]
impl SummaryCapability for OllamaSummary {
    async fn summarize(
        &self,
        query: &str,
        comparisons: &[Comparison],
    ) -> Result<Summary, CapabilityError> {
        let prompt = Self::build_prompt(query, comparisons);
        let response = self.client.generate(&prompt).await?;

        // A prose-only answer still yields a usable summary.
        let summary = match serde_json::from_str::<RawSummary>(extract_json_block(&response)) {
            Ok(raw) => Summary {
                executive_summary: raw.executive_summary,
                key_findings: raw.key_findings,
                recommendations: raw.recommendations,
                methodology: METHODOLOGY.to_string(),
                limitations: raw.limitations,
                generated_at: Utc::now(),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Summary was not valid JSON, using raw text");
                let mut fallback = Summary::new(response.trim().to_string());
                fallback.methodology = METHODOLOGY.to_string();
                fallback
            }
        };

        Ok(summary)
    }
}
