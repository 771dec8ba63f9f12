use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{
    ExtractionError, Extractor, OcrEngine, PdfRasterizer, PdfTextLayer,
};
use crate::domain::{Document, ExtractionUnit, FileType};

use super::run_blocking;
use super::text_sanitizer::sanitize_extracted_text;

pub const OCR_PAGE_SEPARATOR: &str = "\n";

/// Text-layer extraction with an OCR fallback for scanned PDFs.
///
/// Pages are read from the text layer first, one unit per non-empty page.
/// Only when the text layer yields no characters at all (or cannot be parsed)
/// are the pages rasterized and OCR'd; the recovered page texts are joined
/// into a single unit without page numbers.
pub struct PdfAdapter {
    text_layer: Arc<dyn PdfTextLayer>,
    rasterizer: Arc<dyn PdfRasterizer>,
    ocr: Arc<dyn OcrEngine>,
}

impl PdfAdapter {
    pub fn new(
        text_layer: Arc<dyn PdfTextLayer>,
        rasterizer: Arc<dyn PdfRasterizer>,
        ocr: Arc<dyn OcrEngine>,
    ) -> Self {
        Self {
            text_layer,
            rasterizer,
            ocr,
        }
    }

    async fn extract_text_layer(
        &self,
        document: &Document,
    ) -> Result<Vec<ExtractionUnit>, ExtractionError> {
        let text_layer = Arc::clone(&self.text_layer);
        let path = document.storage_path.clone();
        let pages = run_blocking(move || text_layer.extract_pages(&path)).await??;

        let units = pages
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                let text = sanitize_extracted_text(raw);
                (!text.is_empty()).then(|| {
                    ExtractionUnit::new(text, &document.filename, Some((index + 1) as u32))
                })
            })
            .collect::<Vec<_>>();

        tracing::info!(
            page_count = pages.len(),
            pages_with_text = units.len(),
            "PDF text layer extraction complete"
        );
        Ok(units)
    }

    async fn extract_with_ocr(
        &self,
        document: &Document,
    ) -> Result<Option<ExtractionUnit>, ExtractionError> {
        let rasterizer = Arc::clone(&self.rasterizer);
        let ocr = Arc::clone(&self.ocr);
        let path: PathBuf = document.storage_path.clone();

        let page_texts = run_blocking(move || -> Result<Vec<String>, ExtractionError> {
            let images = rasterizer.rasterize(&path)?;
            tracing::debug!(pages = images.len(), "PDF rasterized for OCR");

            let texts = images
                .iter()
                .enumerate()
                .map(|(index, image)| match ocr.recognize(image) {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(page = index + 1, error = %e, "Page OCR failed");
                        String::new()
                    }
                })
                .collect();
            Ok(texts)
        })
        .await??;

        let recovered = sanitize_extracted_text(&page_texts.join(OCR_PAGE_SEPARATOR));
        if recovered.is_empty() {
            return Ok(None);
        }

        Ok(Some(ExtractionUnit::new(
            recovered,
            &document.filename,
            None,
        )))
    }
}

#[async_trait]
impl Extractor for PdfAdapter {
    #[tracing::instrument(
        skip(self, document),
        fields(
            document_id = %document.id.as_uuid(),
            filename = %document.filename,
        )
    )]
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractionUnit>, ExtractionError> {
        if document.file_type != FileType::Pdf {
            return Err(ExtractionError::UnsupportedFileType(
                document.file_type.as_str().to_string(),
            ));
        }

        tracing::info!("Processing PDF");

        match self.extract_text_layer(document).await {
            Ok(units) if !units.is_empty() => return Ok(units),
            Ok(_) => tracing::warn!("PDF has no text layer, running OCR"),
            Err(e) => tracing::warn!(error = %e, "PDF text layer unreadable, running OCR"),
        }

        match self.extract_with_ocr(document).await {
            Ok(Some(unit)) => {
                tracing::info!(chars = unit.text.chars().count(), "OCR recovered text");
                Ok(vec![unit])
            }
            Ok(None) => {
                tracing::warn!("OCR produced no text");
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::error!(error = %e, "OCR fallback failed");
                Ok(Vec::new())
            }
        }
    }
}
