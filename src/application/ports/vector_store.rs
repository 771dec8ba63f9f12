use async_trait::async_trait;

use super::{CollectionConfig, SearchResult, VectorStoreError};
use crate::domain::{Chunk, Embedding};

/// Persistent nearest-neighbour index over chunk embeddings.
///
/// Implementations serialize concurrent `upsert` calls themselves; an upserted
/// chunk is visible to `search` once the call has returned.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Creates the backing collection if it is missing. Returns `false` when
    /// an existing one was reopened.
    async fn create_collection(&self, config: &CollectionConfig) -> Result<bool, VectorStoreError>;

    async fn collection_exists(&self) -> Result<bool, VectorStoreError>;

    async fn upsert(&self, chunks: &[Chunk], embeddings: &[Embedding])
    -> Result<(), VectorStoreError>;

    async fn search(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError>;

    async fn count(&self) -> Result<u64, VectorStoreError>;
}
