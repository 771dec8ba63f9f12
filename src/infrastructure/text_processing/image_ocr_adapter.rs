use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{ExtractionError, Extractor, OcrEngine};
use crate::domain::{Document, ExtractionUnit, FileType};

use super::run_blocking;
use super::text_sanitizer::sanitize_extracted_text;

/// OCRs a png/jpg upload into exactly one unit.
///
/// Recognition failures do not abort the document: the unit is emitted with
/// empty text, which the chunker turns into zero chunks.
pub struct ImageOcrAdapter {
    ocr: Arc<dyn OcrEngine>,
}

impl ImageOcrAdapter {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }
}

#[async_trait]
impl Extractor for ImageOcrAdapter {
    #[tracing::instrument(skip(self, document), fields(filename = %document.filename))]
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractionUnit>, ExtractionError> {
        if document.file_type != FileType::Image {
            return Err(ExtractionError::UnsupportedFileType(
                document.file_type.as_str().to_string(),
            ));
        }

        tracing::info!("Running OCR on image");

        let data = tokio::fs::read(document.path())
            .await
            .map_err(|source| ExtractionError::Io {
                filename: document.filename.clone(),
                source,
            })?;

        let ocr = Arc::clone(&self.ocr);
        let recognized = run_blocking(move || ocr.recognize(&data)).await?;

        let text = match recognized {
            Ok(raw) => sanitize_extracted_text(&raw),
            Err(e) => {
                tracing::warn!(placeholder = %format!("OCR Error: {e}"), "Image OCR failed");
                String::new()
            }
        };

        tracing::debug!(chars = text.chars().count(), "Image OCR complete");
        Ok(vec![ExtractionUnit::new(text, &document.filename, None)])
    }
}
