use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::{Comparison, ExtractedClause};

use super::CapabilityError;

/// Topic -> jurisdiction -> clauses. The compare stage only hands over topics
/// with clauses from at least two distinct jurisdictions.
pub type ClausesByTopic = BTreeMap<String, BTreeMap<String, Vec<ExtractedClause>>>;

#[async_trait]
pub trait ComparisonCapability: Send + Sync {
    async fn compare(
        &self,
        clauses_by_topic: &ClausesByTopic,
    ) -> Result<Vec<Comparison>, CapabilityError>;
}
