use async_trait::async_trait;

use crate::domain::{Document, ExtractedClause};

use super::CapabilityError;

/// Clause extraction for a single document. The extract stage calls this once
/// per document and treats a failure as a skip for that document only.
#[async_trait]
pub trait ExtractionCapability: Send + Sync {
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractedClause>, CapabilityError>;
}
