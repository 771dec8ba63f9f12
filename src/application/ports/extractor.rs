use async_trait::async_trait;

use crate::domain::{Document, ExtractionUnit};

use super::{OcrError, PdfTextError, RasterizeError};

#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractionUnit>, ExtractionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("unreadable encoding in {filename}: {reason}")]
    UnreadableEncoding { filename: String, reason: String },
    #[error("failed to read {filename}: {source}")]
    Io {
        filename: String,
        #[source]
        source: std::io::Error,
    },
    #[error("ocr: {0}")]
    Ocr(#[from] OcrError),
    #[error("pdf text layer: {0}")]
    PdfText(#[from] PdfTextError),
    #[error("rasterization: {0}")]
    Rasterize(#[from] RasterizeError),
    #[error("blocking task failed: {0}")]
    TaskJoin(String),
}
