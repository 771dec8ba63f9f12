use std::sync::Arc;

use crate::application::ports::{VectorStore, VectorStoreError};
use crate::presentation::config::{IndexProvider, IndexSettings};

use super::{LocalVectorIndex, QdrantAdapter};

pub struct VectorStoreFactory;

impl VectorStoreFactory {
    /// Opens the configured index backend. The collection itself is created
    /// separately through `VectorStore::create_collection`.
    pub async fn create(
        settings: &IndexSettings,
        dimension: usize,
    ) -> Result<Arc<dyn VectorStore>, VectorStoreError> {
        match settings.provider {
            IndexProvider::Local => {
                tracing::info!(path = %settings.path.display(), "Using local vector index");
                let index = LocalVectorIndex::open(&settings.path, dimension).await?;
                Ok(Arc::new(index))
            }
            IndexProvider::Qdrant => {
                tracing::info!(
                    url = %settings.url,
                    collection = %settings.collection,
                    "Using Qdrant vector index"
                );
                let adapter = QdrantAdapter::new(&settings.url, settings.collection.clone()).await?;
                Ok(Arc::new(adapter))
            }
        }
    }
}
