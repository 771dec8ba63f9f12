use std::sync::Arc;

use crate::application::ports::Embedder;
use crate::presentation::config::{EmbeddingProvider, EmbeddingsSettings};

use super::{LocalCandleEmbedder, OpenAiEmbedder};

pub struct EmbedderFactory;

#[derive(Debug, thiserror::Error)]
pub enum EmbedderFactoryError {
    #[error("missing API key: OpenAI embedder requires embeddings.api_key")]
    MissingApiKey,
    #[error("model initialization failed: {0}")]
    InitializationFailed(String),
    #[error("model produces {actual}-dimensional vectors but embeddings.dimension is {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

impl EmbedderFactory {
    pub fn create(
        settings: &EmbeddingsSettings,
    ) -> Result<Arc<dyn Embedder>, EmbedderFactoryError> {
        let model = settings.model.clone();
        match settings.provider {
            EmbeddingProvider::Local => {
                tracing::info!(model = %model, "Loading local Candle embedding model");
                let embedder = LocalCandleEmbedder::new(&model)
                    .map_err(|e| EmbedderFactoryError::InitializationFailed(e.to_string()))?;
                let actual = embedder.dimensions();
                if actual != settings.dimension {
                    return Err(EmbedderFactoryError::DimensionMismatch {
                        expected: settings.dimension,
                        actual,
                    });
                }
                Ok(Arc::new(embedder))
            }
            EmbeddingProvider::OpenAi => {
                let key = settings
                    .api_key
                    .clone()
                    .filter(|k| !k.is_empty())
                    .ok_or(EmbedderFactoryError::MissingApiKey)?;
                tracing::info!(model = %model, "Using OpenAI embedding model");
                let mut embedder = OpenAiEmbedder::new(key, model, settings.dimension);
                if let Some(base_url) = settings.base_url.as_deref().filter(|u| !u.is_empty()) {
                    embedder = embedder.with_base_url(base_url);
                }
                Ok(Arc::new(embedder))
            }
        }
    }
}
