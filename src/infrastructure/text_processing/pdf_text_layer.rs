use std::path::Path;

use pdf_oxide::PdfDocument;

use crate::application::ports::{PdfTextError, PdfTextLayer};

/// Reads the embedded text layer page by page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfOxideTextLayer;

impl PdfTextLayer for PdfOxideTextLayer {
    fn extract_pages(&self, pdf: &Path) -> Result<Vec<String>, PdfTextError> {
        let doc = PdfDocument::open(pdf).map_err(|e| PdfTextError::ParseFailed(e.to_string()))?;

        let page_count = doc
            .page_count()
            .map_err(|e| PdfTextError::PageCount(e.to_string()))?;

        let mut pages = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            // An unreadable page counts as a page without text.
            pages.push(doc.extract_text(page_index).unwrap_or_default());
        }

        Ok(pages)
    }
}
