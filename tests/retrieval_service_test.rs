mod helpers;

use std::path::Path;
use std::sync::Arc;

use parchment::application::ports::{
    CollectionConfig, Embedder, LlmClient, VectorStore,
};
use parchment::application::services::{RetrievalError, RetrievalService, StuffPromptBuilder};
use parchment::domain::{Chunk, DocumentId, EXCERPT_MAX_CHARS};
use parchment::infrastructure::persistence::LocalVectorIndex;

use helpers::{
    FailingEmbedder, FailingLlmClient, KEYWORD_DIMENSIONS, KeywordEmbedder, RecordingLlmClient,
};

async fn open_index(dir: &Path) -> Arc<LocalVectorIndex> {
    let index = LocalVectorIndex::open(dir, KEYWORD_DIMENSIONS).await.unwrap();
    index
        .create_collection(&CollectionConfig::new(KEYWORD_DIMENSIONS as u64))
        .await
        .unwrap();
    Arc::new(index)
}

async fn index_texts(index: &LocalVectorIndex, source: &str, texts: &[&str]) {
    let document_id = DocumentId::new();
    let chunks: Vec<Chunk> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| {
            Chunk::new(text.to_string(), document_id, source.to_string(), None, i * 10)
                .with_paragraph(i as u32 + 1)
        })
        .collect();
    let refs: Vec<&str> = texts.to_vec();
    let embeddings = KeywordEmbedder.embed_batch(&refs).await.unwrap();
    index.upsert(&chunks, &embeddings).await.unwrap();
}

fn service(
    embedder: Arc<dyn Embedder>,
    llm_client: Arc<dyn LlmClient>,
    vector_store: Arc<dyn VectorStore>,
) -> RetrievalService {
    RetrievalService::new(
        embedder,
        llm_client,
        vector_store,
        Arc::new(StuffPromptBuilder),
        5,
    )
}

#[tokio::test]
async fn given_indexed_document_when_querying_then_answer_cites_original_filename() {
    let dir = tempfile::tempdir().unwrap();
    let index = open_index(dir.path()).await;
    index_texts(
        &index,
        "rust-notes.txt",
        &["Rust ownership and borrowing.", "Ocean currents are warm."],
    )
    .await;
    let llm = Arc::new(RecordingLlmClient::new("Ownership rules."));
    let retrieval = service(Arc::new(KeywordEmbedder), llm.clone(), index);

    let answer = retrieval.query("What about rust?").await.unwrap();

    assert_eq!(answer.answer, "Ownership rules.");
    assert_eq!(answer.sources.len(), 2);
    assert_eq!(answer.sources[0].document, "rust-notes.txt");
    assert_eq!(answer.sources[0].content, "Rust ownership and borrowing.");
    assert_eq!(answer.sources[0].page, None);
    assert_eq!(answer.sources[0].paragraph, Some(1));
    assert!(answer.themes.starts_with("What about rust? - common themes: "));
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn given_more_chunks_than_k_when_querying_then_returns_five_ranked_sources() {
    let dir = tempfile::tempdir().unwrap();
    let index = open_index(dir.path()).await;
    let texts: Vec<String> = (0..8).map(|i| format!("tax invoice number {i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    index_texts(&index, "ledger.txt", &refs).await;
    let retrieval = service(
        Arc::new(KeywordEmbedder),
        Arc::new(RecordingLlmClient::new("Eight invoices.")),
        index,
    );

    let answer = retrieval.query("tax invoice").await.unwrap();

    let ranks: Vec<usize> = answer.sources.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn given_empty_index_when_querying_then_model_is_still_asked_without_context() {
    let dir = tempfile::tempdir().unwrap();
    let index = open_index(dir.path()).await;
    let llm = Arc::new(RecordingLlmClient::new("I don't know."));
    let retrieval = service(Arc::new(KeywordEmbedder), llm.clone(), index);

    let answer = retrieval.query("q").await.unwrap();

    assert_eq!(answer.answer, "I don't know.");
    assert!(answer.sources.is_empty());
    assert_eq!(answer.themes, "q - common themes: ");
    assert_eq!(llm.calls(), 1);
    assert!(llm.last_prompt().unwrap().contains("Question: q"));
}

#[tokio::test]
async fn given_long_chunk_when_querying_then_source_content_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let index = open_index(dir.path()).await;
    let long_text = format!("ocean {}", "\u{e9}".repeat(600));
    index_texts(&index, "long.txt", &[long_text.as_str()]).await;
    let llm = Arc::new(RecordingLlmClient::new("Long."));
    let retrieval = service(Arc::new(KeywordEmbedder), llm.clone(), index);

    let answer = retrieval.query("ocean").await.unwrap();

    assert_eq!(answer.sources[0].content.chars().count(), EXCERPT_MAX_CHARS);
    assert!(long_text.starts_with(&answer.sources[0].content));
    assert!(llm.last_prompt().unwrap().contains(&long_text));
}

#[tokio::test]
async fn given_retrieved_chunks_when_querying_then_prompt_stuffs_them_in_rank_order() {
    let dir = tempfile::tempdir().unwrap();
    let index = open_index(dir.path()).await;
    index_texts(&index, "mixed.txt", &["gamma only", "alpha alpha alpha"]).await;
    let llm = Arc::new(RecordingLlmClient::new("Alpha."));
    let retrieval = service(Arc::new(KeywordEmbedder), llm.clone(), index);

    retrieval.query("alpha").await.unwrap();

    let prompt = llm.last_prompt().unwrap();
    let alpha_at = prompt.find("alpha alpha alpha").unwrap();
    let gamma_at = prompt.find("gamma only").unwrap();
    assert!(alpha_at < gamma_at);
    assert!(prompt.ends_with("Question: alpha\nHelpful Answer:"));
}

#[tokio::test]
async fn given_blank_question_when_querying_then_answers_without_sources() {
    let dir = tempfile::tempdir().unwrap();
    let index = open_index(dir.path()).await;
    index_texts(&index, "notes.txt", &["alpha beta"]).await;
    let llm = Arc::new(RecordingLlmClient::new("Please ask a question."));
    let retrieval = service(Arc::new(FailingEmbedder), llm.clone(), index);

    let answer = retrieval.query("   ").await.unwrap();

    assert!(answer.sources.is_empty());
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn given_failing_model_when_querying_then_returns_completion_error() {
    let dir = tempfile::tempdir().unwrap();
    let index = open_index(dir.path()).await;
    let retrieval = service(Arc::new(KeywordEmbedder), Arc::new(FailingLlmClient), index);

    let result = retrieval.query("alpha").await;

    assert!(matches!(result, Err(RetrievalError::Completion(_))));
}

#[tokio::test]
async fn given_failing_embedder_when_querying_then_returns_embedding_error() {
    let dir = tempfile::tempdir().unwrap();
    let index = open_index(dir.path()).await;
    let llm = Arc::new(RecordingLlmClient::new("unused"));
    let retrieval = service(Arc::new(FailingEmbedder), llm.clone(), index);

    let result = retrieval.query("alpha").await;

    assert!(matches!(result, Err(RetrievalError::Embedding(_))));
    assert_eq!(llm.calls(), 0);
}
