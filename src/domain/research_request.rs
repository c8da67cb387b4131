use serde::{Deserialize, Serialize};

/// The caller-supplied parameters of one research run. Immutable after submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub query: String,
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub document_types: Vec<String>,
    #[serde(default = "default_max_documents")]
    pub max_documents: usize,
}

fn default_max_documents() -> usize {
    10
}

impl ResearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            regions: Vec::new(),
            document_types: Vec::new(),
            max_documents: default_max_documents(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<String>) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_document_types(mut self, document_types: Vec<String>) -> Self {
        self.document_types = document_types;
        self
    }

    pub fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.max_documents = max_documents;
        self
    }
}
