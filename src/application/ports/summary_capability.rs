use async_trait::async_trait;

use crate::domain::{Comparison, Summary};

use super::CapabilityError;

#[async_trait]
pub trait SummaryCapability: Send + Sync {
    async fn summarize(
        &self,
        query: &str,
        comparisons: &[Comparison],
    ) -> Result<Summary, CapabilityError>;
}
