use async_trait::async_trait;

use crate::domain::{Chunk, DocumentId, ExtractionUnit};

#[async_trait]
pub trait TextSplitter: Send + Sync {
    async fn split(
        &self,
        unit: &ExtractionUnit,
        document_id: DocumentId,
    ) -> Result<Vec<Chunk>, TextSplitterError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TextSplitterError {
    #[error("invalid splitter configuration: {0}")]
    InvalidConfiguration(String),
    #[error("splitting failed: {0}")]
    SplittingFailed(String),
}
