mod composite_extractor;
mod image_ocr_adapter;
mod pdf_adapter;
mod pdf_rasterizer;
mod pdf_text_layer;
mod plain_text_adapter;
mod recursive_character_splitter;
mod tesseract_ocr;
mod text_sanitizer;

use crate::application::ports::ExtractionError;

pub use composite_extractor::CompositeExtractor;
pub use image_ocr_adapter::ImageOcrAdapter;
pub use pdf_adapter::{OCR_PAGE_SEPARATOR, PdfAdapter};
pub use pdf_rasterizer::{DEFAULT_RENDER_DPI, PdfiumRasterizer};
pub use pdf_text_layer::PdfOxideTextLayer;
pub use plain_text_adapter::PlainTextAdapter;
pub use recursive_character_splitter::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_SEPARATORS, RecursiveCharacterSplitter,
};
pub use tesseract_ocr::{DEFAULT_OCR_LANGUAGE, DEFAULT_TESSERACT_BINARY, TesseractOcr};
pub use text_sanitizer::sanitize_extracted_text;

/// Runs CPU-bound or process-spawning work on the blocking pool.
async fn run_blocking<F, T>(work: F) -> Result<T, ExtractionError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ExtractionError::TaskJoin(e.to_string()))
}
