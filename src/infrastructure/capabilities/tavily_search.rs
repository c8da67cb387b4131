use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{CapabilityError, SearchCapability};
use crate::domain::{Document, ResearchRequest};

const TAVILY_ENDPOINT: &str = "https://api.tavily.com/search";

const INCLUDE_DOMAINS: &[&str] = &[
    "europa.eu",
    "ec.europa.eu",
    "whitehouse.gov",
    "congress.gov",
    "gov.uk",
    "parliament.uk",
    "oecd.org",
    "un.org",
    "wto.org",
    "academic.oup.com",
    "springer.com",
    "ieee.org",
    "arxiv.org",
];

const EXCLUDE_DOMAINS: &[&str] = &["twitter.com", "facebook.com", "instagram.com"];

/// Tavily-backed document discovery. Region and document-type filters are
/// expanded into extra search terms rather than sent as API filters.
pub struct TavilySearch {
    http: reqwest::Client,
    api_key: String,
    max_results: usize,
}

#[derive(Serialize)]
struct SearchBody<'a> {
    api_key: &'a str,
    query: String,
    search_depth: &'a str,
    include_domains: &'a [&'a str],
    exclude_domains: &'a [&'a str],
    max_results: usize,
    include_answer: bool,
    include_raw_content: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    raw_content: Option<String>,
    score: Option<f64>,
}

impl TavilySearch {
    pub fn new(api_key: impl Into<String>, max_results: usize) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            max_results,
        }
    }

    fn build_query(request: &ResearchRequest) -> String {
        let mut terms: Vec<String> = vec![request.query.clone()];

        for region in &request.regions {
            match region.to_uppercase().as_str() {
                "EU" => terms.extend(
                    ["European Union", "EU", "European Commission"]
                        .iter()
                        .map(|s| s.to_string()),
                ),
                "US" => terms.extend(
                    ["United States", "US", "federal"]
                        .iter()
                        .map(|s| s.to_string()),
                ),
                "UK" => terms.extend(
                    ["United Kingdom", "UK", "British"]
                        .iter()
                        .map(|s| s.to_string()),
                ),
                _ => terms.push(region.clone()),
            }
        }

        for document_type in &request.document_types {
            match document_type.as_str() {
                "legislation" => terms.extend(
                    ["legislation", "law", "act", "regulation"]
                        .iter()
                        .map(|s| s.to_string()),
                ),
                "policy_framework" => terms.extend(
                    ["policy", "framework", "guidelines", "strategy"]
                        .iter()
                        .map(|s| s.to_string()),
                ),
                "white_paper" => terms.extend(
                    ["white paper", "report"].iter().map(|s| s.to_string()),
                ),
                other => terms.push(other.to_string()),
            }
        }

        terms.join(" ")
    }

    fn infer_region(result: &SearchResult, requested: &[String]) -> Option<String> {
        let haystack = format!("{} {}", result.url, result.title).to_lowercase();

        for region in requested {
            if haystack.contains(&region.to_lowercase()) {
                return Some(region.clone());
            }
        }
        if haystack.contains("europa.eu") || haystack.contains("european") {
            return Some("EU".to_string());
        }
        if haystack.contains(".gov/") || haystack.contains("whitehouse") {
            return Some("US".to_string());
        }
        if haystack.contains("gov.uk") || haystack.contains("parliament.uk") {
            return Some("UK".to_string());
        }
        None
    }

    fn source_of(url: &str) -> String {
        url.split("//")
            .nth(1)
            .and_then(|rest| rest.split('/').next())
            .unwrap_or("unknown")
            .to_string()
    }
}

#[async_trait]
impl SearchCapability for TavilySearch {
    async fn find(&self, request: &ResearchRequest) -> Result<Vec<Document>, CapabilityError> {
        let body = SearchBody {
            api_key: &self.api_key,
            query: Self::build_query(request),
            search_depth: "advanced",
            include_domains: INCLUDE_DOMAINS,
            exclude_domains: EXCLUDE_DOMAINS,
            max_results: self.max_results,
            include_answer: false,
            include_raw_content: true,
        };

        let response = self
            .http
            .post(TAVILY_ENDPOINT)
            .json(&body)
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
                "tavily returned status {}",
                response.status()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| CapabilityError::InvalidResponse(e.to_string()))?;

        let documents = parsed
            .results
            .into_iter()
            .map(|result| {
                let region = Self::infer_region(&result, &request.regions);
                let content = result
                    .raw_content
                    .clone()
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| result.content.clone());
                let mut document = Document::new(
                    result.title.clone(),
                    result.url.clone(),
                    content,
                    Self::source_of(&result.url),
                );
                document.region = region;
                document.relevance_score = result.score;
                document
            })
            .collect();

        Ok(documents)
    }
}
