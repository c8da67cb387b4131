use serde::{Deserialize, Serialize};

use crate::application::ports::CapabilityError;

/// Thin client for the Ollama generate endpoint, shared by the extraction,
/// comparison, and summary adapters.
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, CapabilityError> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    CapabilityError::Unreachable(e.to_string())
                } else {
                    CapabilityError::RequestFailed(e.to_string())
                }
            })?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CapabilityError::RateLimited);
        }
        if !response.status().is_success() {
            return Err(CapabilityError::RequestFailed(format!(
                "ollama returned status {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::InvalidResponse(e.to_string()))?;

        Ok(body.response)
    }
}

/// Models tend to wrap JSON in markdown fences or prose. Slice out the
/// outermost JSON object or array so serde has a chance.
pub(crate) fn extract_json_block(text: &str) -> &str {
    let trimmed = text.trim();
    let object = trimmed.find('{').and_then(|start| {
        trimmed.rfind('}').and_then(|end| {
            if end > start {
                Some(&trimmed[start..=end])
            } else {
                None
            }
        })
    });
    let array = trimmed.find('[').and_then(|start| {
        trimmed.rfind(']').and_then(|end| {
            if end > start {
                Some(&trimmed[start..=end])
            } else {
                None
            }
        })
    });

    match (object, array) {
        (Some(o), Some(a)) => {
            if a.len() > o.len() && trimmed.find('[') < trimmed.find('{') {
                a
            } else {
                o
            }
        }
        (Some(o), None) => o,
        (None, Some(a)) => a,
        (None, None) => trimmed,
    }
}
