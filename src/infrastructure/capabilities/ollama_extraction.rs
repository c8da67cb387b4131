use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::application::ports::{CapabilityError, ExtractionCapability};
use crate::domain::{ClauseType, Document, ExtractedClause};

use super::ollama_client::{extract_json_block, OllamaClient};

/// Prompts the model for structured clauses from one document.
pub struct OllamaExtraction {
    client: Arc<OllamaClient>,
    max_content_length: usize,
}

#[derive(Deserialize)]
struct RawClause {
    clause_text: String,
    #[serde(default)]
    clause_type: String,
    #[serde(default)]
    topic: String,
    #[serde(default)]
    key_entities: Vec<String>,
}

impl OllamaExtraction {
    pub fn new(client: Arc<OllamaClient>, max_content_length: usize) -> Self {
        Self {
            client,
            max_content_length,
        }
    }

    fn build_prompt(&self, document: &Document) -> String {
        let content: String = document.content.chars().take(self.max_content_length).collect();
        format!(
            r#"You are a legal expert specializing in policy analysis. Extract the key legal clauses from the document below.

Document Title: {title}
Source: {source}
Region: {region}

Document Content:
{content}

Extract the most important requirements, prohibitions, definitions, and enforcement provisions. Respond with a JSON array only:
[
  {{
    "clause_text": "exact text of the clause",
    "clause_type": "requirement|prohibition|definition|enforcement|other",
    "topic": "safety|privacy|transparency|accountability|governance|other",
    "key_entities": ["entity1", "entity2"]
  }}
]"#,
            title = document.title,
            source = document.source,
            region = document.region.as_deref().unwrap_or("Unknown"),
            content = content,
        )
    }
}

#[async_trait]
impl ExtractionCapability for OllamaExtraction {
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractedClause>, CapabilityError> {
        let prompt = self.build_prompt(document);
        let response = self.client.generate(&prompt).await?;

        let raw: Vec<RawClause> = serde_json::from_str(extract_json_block(&response))
            .map_err(|e| CapabilityError::InvalidResponse(e.to_string()))?;

        let jurisdiction = document
            .region
            .clone()
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(raw
            .into_iter()
            .filter(|c| !c.clause_text.trim().is_empty())
            .map(|c| ExtractedClause {
                clause_text: c.clause_text,
                clause_type: ClauseType::from_label(&c.clause_type),
                topic: if c.topic.trim().is_empty() {
                    "other".to_string()
                } else {
                    c.topic.to_lowercase()
                },
                jurisdiction: jurisdiction.clone(),
                document_source: document.title.clone(),
                key_entities: c.key_entities,
            })
            .collect())
    }
}
