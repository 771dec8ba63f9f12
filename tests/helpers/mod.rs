#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use parchment::application::ports::{
    CollectionConfig, Embedder, EmbedderError, LlmClient, LlmClientError, OcrEngine, OcrError,
    PdfRasterizer, PdfTextError, PdfTextLayer, RasterizeError, SearchResult, VectorStore,
    VectorStoreError,
};
use parchment::domain::{Chunk, Document, Embedding};

/// Terms the keyword embedder projects onto, one dimension each.
pub const VOCABULARY: [&str; 7] = ["alpha", "beta", "gamma", "rust", "ocean", "invoice", "tax"];
pub const KEYWORD_DIMENSIONS: usize = VOCABULARY.len() + 1;

/// Writes `contents` under `dir` and returns a document pointing at it.
pub fn write_document(dir: &Path, filename: &str, contents: &[u8]) -> Document {
    let path: PathBuf = dir.join(filename);
    std::fs::write(&path, contents).unwrap();
    Document::new(filename.to_string(), path)
}

/// Deterministic embedder: one dimension per vocabulary term (occurrence
/// count) plus a constant bias dimension so no vector is zero.
pub struct KeywordEmbedder;

impl KeywordEmbedder {
    pub fn vector_for(text: &str) -> Vec<f32> {
        let lowered = text.to_lowercase();
        let mut values: Vec<f32> = VOCABULARY
            .iter()
            .map(|term| lowered.matches(term).count() as f32)
            .collect();
        values.push(0.1);
        values
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        Ok(Embedding::new(Self::vector_for(text)))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        Ok(texts
            .iter()
            .map(|text| Embedding::new(Self::vector_for(text)))
            .collect())
    }

    fn dimensions(&self) -> usize {
        KEYWORD_DIMENSIONS
    }
}

pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedderError> {
        Err(EmbedderError::ApiRequestFailed("embedding service down".to_string()))
    }

    async fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        Err(EmbedderError::ApiRequestFailed("embedding service down".to_string()))
    }

    fn dimensions(&self) -> usize {
        KEYWORD_DIMENSIONS
    }
}

/// Returns one embedding fewer than requested.
pub struct ShortBatchEmbedder;

#[async_trait]
impl Embedder for ShortBatchEmbedder {
    async fn embed(&self, text: &str) -> Result<Embedding, EmbedderError> {
        KeywordEmbedder.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        let mut embeddings = KeywordEmbedder.embed_batch(texts).await?;
        embeddings.pop();
        Ok(embeddings)
    }

    fn dimensions(&self) -> usize {
        KEYWORD_DIMENSIONS
    }
}

/// Reports the keyword dimension count but returns shorter vectors.
pub struct WrongDimensionEmbedder;

#[async_trait]
impl Embedder for WrongDimensionEmbedder {
    async fn embed(&self, _text: &str) -> Result<Embedding, EmbedderError> {
        Ok(Embedding::new(vec![1.0; KEYWORD_DIMENSIONS - 1]))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbedderError> {
        Ok(texts
            .iter()
            .map(|_| Embedding::new(vec![1.0; KEYWORD_DIMENSIONS - 1]))
            .collect())
    }

    fn dimensions(&self) -> usize {
        KEYWORD_DIMENSIONS
    }
}

/// Counts calls and remembers the last prompt it was sent.
pub struct RecordingLlmClient {
    answer: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingLlmClient {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for RecordingLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.answer.clone())
    }
}

pub struct FailingLlmClient;

#[async_trait]
impl LlmClient for FailingLlmClient {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmClientError> {
        Err(LlmClientError::RateLimited)
    }
}

/// OCR engine returning a fixed result and counting invocations.
pub struct CountingOcr {
    result: Result<String, String>,
    calls: AtomicUsize,
}

impl CountingOcr {
    pub fn recognizing(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for CountingOcr {
    fn recognize(&self, _image: &[u8]) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result
            .clone()
            .map_err(OcrError::RecognitionFailed)
    }
}

/// Rasterizer producing `pages` placeholder images.
pub struct CountingRasterizer {
    pages: usize,
    calls: AtomicUsize,
}

impl CountingRasterizer {
    pub fn with_pages(pages: usize) -> Self {
        Self {
            pages,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl PdfRasterizer for CountingRasterizer {
    fn rasterize(&self, _pdf: &Path) -> Result<Vec<Vec<u8>>, RasterizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..self.pages).map(|page| vec![page as u8; 4]).collect())
    }
}

pub struct FailingRasterizer;

impl PdfRasterizer for FailingRasterizer {
    fn rasterize(&self, _pdf: &Path) -> Result<Vec<Vec<u8>>, RasterizeError> {
        Err(RasterizeError::RendererUnavailable("libpdfium not found".to_string()))
    }
}

/// Text layer returning fixed page strings.
pub struct StubTextLayer {
    pages: Result<Vec<String>, String>,
}

impl StubTextLayer {
    pub fn with_pages(pages: &[&str]) -> Self {
        Self {
            pages: Ok(pages.iter().map(|p| p.to_string()).collect()),
        }
    }

    pub fn empty(page_count: usize) -> Self {
        Self {
            pages: Ok(vec![String::new(); page_count]),
        }
    }

    pub fn unreadable() -> Self {
        Self {
            pages: Err("xref table missing".to_string()),
        }
    }
}

impl PdfTextLayer for StubTextLayer {
    fn extract_pages(&self, _pdf: &Path) -> Result<Vec<String>, PdfTextError> {
        self.pages.clone().map_err(PdfTextError::ParseFailed)
    }
}

/// Index that is reachable for reads but rejects writes.
pub struct UnwritableVectorStore;

#[async_trait]
impl VectorStore for UnwritableVectorStore {
    async fn create_collection(&self, _config: &CollectionConfig) -> Result<bool, VectorStoreError> {
        Ok(false)
    }

    async fn collection_exists(&self) -> Result<bool, VectorStoreError> {
        Ok(true)
    }

    async fn upsert(
        &self,
        _chunks: &[Chunk],
        _embeddings: &[Embedding],
    ) -> Result<(), VectorStoreError> {
        Err(VectorStoreError::ConnectionFailed("index unavailable".to_string()))
    }

    async fn search(
        &self,
        _embedding: &Embedding,
        _top_k: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        Ok(Vec::new())
    }

    async fn count(&self) -> Result<u64, VectorStoreError> {
        Ok(0)
    }
}
