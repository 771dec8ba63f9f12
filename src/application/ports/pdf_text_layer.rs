use std::path::Path;

/// Structured (non-OCR) text extraction, one string per page in page order.
pub trait PdfTextLayer: Send + Sync {
    fn extract_pages(&self, pdf: &Path) -> Result<Vec<String>, PdfTextError>;
}

#[derive(Debug, thiserror::Error)]
pub enum PdfTextError {
    #[error("failed to parse pdf: {0}")]
    ParseFailed(String),
    #[error("failed to read page count: {0}")]
    PageCount(String),
}
