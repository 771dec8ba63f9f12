use std::fmt;
use std::sync::Arc;

use crate::application::ports::{Embedder, Extractor, TextSplitter, VectorStore, VectorStoreError};
use crate::domain::{Chunk, Document, FileType};

/// Runs extract → chunk → embed → index for uploaded documents.
///
/// Every failure before the index write is converted into a per-document
/// skip so one bad file never aborts its siblings. Only a failing index write
/// surfaces as an error, since the store itself is then unusable for the
/// current request.
pub struct IngestionService {
    extractor: Arc<dyn Extractor>,
    text_splitter: Arc<dyn TextSplitter>,
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<dyn VectorStore>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    Indexed { chunk_count: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedFormat,
    ExtractionFailed(String),
    SplittingFailed(String),
    NoChunks,
    EmbeddingFailed(String),
    EmbeddingCountMismatch { chunks: usize, embeddings: usize },
    EmbeddingDimensionMismatch { expected: usize, actual: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedFormat => write!(f, "unsupported file format"),
            SkipReason::ExtractionFailed(e) => write!(f, "extraction failed: {e}"),
            SkipReason::SplittingFailed(e) => write!(f, "splitting failed: {e}"),
            SkipReason::NoChunks => write!(f, "no chunks produced"),
            SkipReason::EmbeddingFailed(e) => write!(f, "embedding failed: {e}"),
            SkipReason::EmbeddingCountMismatch { chunks, embeddings } => write!(
                f,
                "embedding count mismatch: {embeddings} embeddings for {chunks} chunks"
            ),
            SkipReason::EmbeddingDimensionMismatch { expected, actual } => write!(
                f,
                "embedding dimension mismatch: expected {expected}, got {actual}"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<(String, DocumentOutcome)>,
}

impl BatchReport {
    pub fn record(&mut self, filename: impl Into<String>, outcome: DocumentOutcome) {
        self.outcomes.push((filename.into(), outcome));
    }

    pub fn indexed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| matches!(outcome, DocumentOutcome::Indexed { .. }))
            .count()
    }

    pub fn chunk_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|(_, outcome)| match outcome {
                DocumentOutcome::Indexed { chunk_count } => *chunk_count,
                DocumentOutcome::Skipped(_) => 0,
            })
            .sum()
    }
}

impl IngestionService {
    pub fn new(
        extractor: Arc<dyn Extractor>,
        text_splitter: Arc<dyn TextSplitter>,
        embedder: Arc<dyn Embedder>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            extractor,
            text_splitter,
            embedder,
            vector_store,
        }
    }

    /// Ingests documents strictly one after another.
    #[tracing::instrument(skip(self, documents), fields(batch_size = documents.len()))]
    pub async fn ingest_batch(&self, documents: &[Document]) -> Result<BatchReport, IngestionError> {
        let mut report = BatchReport::default();

        for document in documents {
            let outcome = self.ingest_document(document).await?;
            report.record(document.filename.clone(), outcome);
        }

        tracing::info!(
            indexed = report.indexed_count(),
            chunks = report.chunk_count(),
            "Upload batch processed"
        );
        Ok(report)
    }

    #[tracing::instrument(
        skip(self, document),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
            file_type = document.file_type.as_str(),
        )
    )]
    pub async fn ingest_document(
        &self,
        document: &Document,
    ) -> Result<DocumentOutcome, IngestionError> {
        if document.file_type == FileType::Unsupported {
            tracing::warn!("Unsupported file format, skipping");
            return Ok(DocumentOutcome::Skipped(SkipReason::UnsupportedFormat));
        }

        let units = match self.extractor.extract(document).await {
            Ok(units) => units,
            Err(e) => {
                tracing::error!(error = %e, "Extraction failed, skipping");
                return Ok(DocumentOutcome::Skipped(SkipReason::ExtractionFailed(
                    e.to_string(),
                )));
            }
        };

        let mut chunks: Vec<Chunk> = Vec::new();
        for unit in &units {
            match self.text_splitter.split(unit, document.id).await {
                Ok(unit_chunks) => chunks.extend(unit_chunks),
                Err(e) => {
                    tracing::error!(error = %e, "Splitting failed, skipping");
                    return Ok(DocumentOutcome::Skipped(SkipReason::SplittingFailed(
                        e.to_string(),
                    )));
                }
            }
        }

        tracing::debug!(units = units.len(), chunks = chunks.len(), "Document chunked");

        if chunks.is_empty() {
            tracing::warn!("No chunks produced, skipping");
            return Ok(DocumentOutcome::Skipped(SkipReason::NoChunks));
        }

        for chunk in &mut chunks {
            chunk.source = document.filename.clone();
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = match self.embedder.embed_batch(&texts).await {
            Ok(embeddings) => embeddings,
            Err(e) => {
                tracing::error!(error = %e, "Embedding failed, skipping");
                return Ok(DocumentOutcome::Skipped(SkipReason::EmbeddingFailed(
                    e.to_string(),
                )));
            }
        };

        if embeddings.len() != chunks.len() {
            tracing::error!(
                chunks = chunks.len(),
                embeddings = embeddings.len(),
                "Embedding count mismatch, skipping"
            );
            return Ok(DocumentOutcome::Skipped(
                SkipReason::EmbeddingCountMismatch {
                    chunks: chunks.len(),
                    embeddings: embeddings.len(),
                },
            ));
        }

        let expected = self.embedder.dimensions();
        if let Some(actual) = embeddings
            .iter()
            .map(|e| e.dimensions())
            .find(|&actual| actual != expected)
        {
            tracing::error!(expected, actual, "Embedding dimension mismatch, skipping");
            return Ok(DocumentOutcome::Skipped(
                SkipReason::EmbeddingDimensionMismatch { expected, actual },
            ));
        }

        self.vector_store
            .upsert(&chunks, &embeddings)
            .await
            .map_err(IngestionError::Storage)?;

        tracing::info!(chunk_count = chunks.len(), "Document indexed");
        Ok(DocumentOutcome::Indexed {
            chunk_count: chunks.len(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error("storage: {0}")]
    Storage(#[from] VectorStoreError),
}
