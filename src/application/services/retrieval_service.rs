use std::sync::Arc;

use crate::application::ports::{
    Embedder, EmbedderError, LlmClient, LlmClientError, PromptBuilder, SearchResult, VectorStore,
    VectorStoreError,
};
use crate::domain::{Answer, SourceDescriptor};

use super::themes::summarize_themes;

pub struct RetrievalService {
    embedder: Arc<dyn Embedder>,
    llm_client: Arc<dyn LlmClient>,
    vector_store: Arc<dyn VectorStore>,
    prompt_builder: Arc<dyn PromptBuilder>,
    top_k: usize,
}

impl RetrievalService {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        llm_client: Arc<dyn LlmClient>,
        vector_store: Arc<dyn VectorStore>,
        prompt_builder: Arc<dyn PromptBuilder>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            llm_client,
            vector_store,
            prompt_builder,
            top_k,
        }
    }

    /// Answers `question` from the `top_k` nearest chunks.
    ///
    /// An empty index or a blank question is not an error: the model is still
    /// asked, with an empty context, and the answer carries no sources.
    #[tracing::instrument(skip(self, question), fields(top_k = self.top_k))]
    pub async fn query(&self, question: &str) -> Result<Answer, RetrievalError> {
        let results = self.retrieve(question).await?;

        if results.is_empty() {
            tracing::warn!("No chunks retrieved, answering without grounding");
        }

        let chunk_texts: Vec<&str> = results.iter().map(|r| r.chunk.text.as_str()).collect();
        let prompt = self.prompt_builder.build(question, &chunk_texts);

        let answer = self
            .llm_client
            .complete(&prompt)
            .await
            .map_err(RetrievalError::Completion)?;

        let themes = summarize_themes(question, &chunk_texts);

        let sources = results
            .iter()
            .enumerate()
            .map(|(index, r)| SourceDescriptor {
                document: r.chunk.source.clone(),
                page: r.chunk.page,
                content: SourceDescriptor::excerpt(&r.chunk.text),
                paragraph: r.chunk.paragraph,
                rank: index + 1,
            })
            .collect::<Vec<_>>();

        tracing::info!(sources = sources.len(), "Query answered");

        Ok(Answer {
            answer,
            sources,
            themes,
        })
    }

    async fn retrieve(&self, question: &str) -> Result<Vec<SearchResult>, RetrievalError> {
        if question.trim().is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embedder
            .embed(question)
            .await
            .map_err(RetrievalError::Embedding)?;

        let mut results = self
            .vector_store
            .search(&query_embedding, self.top_k)
            .await
            .map_err(RetrievalError::Search)?;

        results.truncate(self.top_k);
        Ok(results)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("embedding: {0}")]
    Embedding(EmbedderError),
    #[error("search: {0}")]
    Search(#[from] VectorStoreError),
    #[error("completion: {0}")]
    Completion(LlmClientError),
}
