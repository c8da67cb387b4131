use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClauseType {
    Requirement,
    Prohibition,
    Definition,
    Enforcement,
    Other,
}

impl ClauseType {
    /// Lenient parse for model-produced labels; anything unrecognized is `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "requirement" => ClauseType::Requirement,
            "prohibition" => ClauseType::Prohibition,
            "definition" => ClauseType::Definition,
            "enforcement" => ClauseType::Enforcement,
            _ => ClauseType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseType::Requirement => "requirement",
            ClauseType::Prohibition => "prohibition",
            ClauseType::Definition => "definition",
            ClauseType::Enforcement => "enforcement",
            ClauseType::Other => "other",
        }
    }
}

impl fmt::Display for ClauseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A structured excerpt of a policy document, tagged with topic and jurisdiction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedClause {
    pub clause_text: String,
    pub clause_type: ClauseType,
    pub topic: String,
    pub jurisdiction: String,
    pub document_source: String,
    #[serde(default)]
    pub key_entities: Vec<String>,
}
