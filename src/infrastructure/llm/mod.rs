mod chat_completions_client;
mod embedder_factory;
mod local_candle_embedder;
mod openai_embedder;

pub use chat_completions_client::{ChatCompletionsClient, GROQ_BASE_URL, OPENAI_BASE_URL};
pub use embedder_factory::{EmbedderFactory, EmbedderFactoryError};
pub use local_candle_embedder::{LocalCandleEmbedder, pool_sentence_embeddings};
pub use openai_embedder::OpenAiEmbedder;
