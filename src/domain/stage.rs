use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four fixed pipeline stages, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Search,
    Extract,
    Compare,
    Summarize,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Search, Stage::Extract, Stage::Compare, Stage::Summarize];

    pub fn first() -> Self {
        Stage::Search
    }

    /// The stage that consumes this stage's output, or `None` after Summarize.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Search => Some(Stage::Extract),
            Stage::Extract => Some(Stage::Compare),
            Stage::Compare => Some(Stage::Summarize),
            Stage::Summarize => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Search => "search",
            Stage::Extract => "extract",
            Stage::Compare => "compare",
            Stage::Summarize => "summarize",
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search" => Ok(Stage::Search),
            "extract" => Ok(Stage::Extract),
            "compare" => Ok(Stage::Compare),
            "summarize" => Ok(Stage::Summarize),
            _ => Err(format!("Invalid stage: {}", s)),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
