/// Image bytes (any format the engine understands) to recognized text.
///
/// Implementations block; callers run them on the blocking pool.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &[u8]) -> Result<String, OcrError>;
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("ocr engine unavailable: {0}")]
    EngineUnavailable(String),
    #[error("recognition failed: {0}")]
    RecognitionFailed(String),
}
