mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    ChunkingSettings, EmbeddingProvider, EmbeddingsSettings, IndexProvider, IndexSettings,
    LlmProvider, LlmSettings, OcrSettings, RetrievalSettings, ServerSettings, Settings,
    StorageSettings,
};
