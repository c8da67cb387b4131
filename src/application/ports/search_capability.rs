use async_trait::async_trait;

use crate::domain::{Document, ResearchRequest};

use super::CapabilityError;

/// External document discovery. Implementations decide how the query and its
/// region/document-type filters translate into search terms.
#[async_trait]
pub trait SearchCapability: Send + Sync {
    async fn find(&self, request: &ResearchRequest) -> Result<Vec<Document>, CapabilityError>;
}
