use async_trait::async_trait;

use crate::application::ports::{ExtractionError, Extractor};
use crate::domain::{Document, ExtractionUnit, FileType};

/// The whole file, decoded as UTF-8, is the single unit.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextAdapter;

#[async_trait]
impl Extractor for PlainTextAdapter {
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractionUnit>, ExtractionError> {
        if document.file_type != FileType::Text {
            return Err(ExtractionError::UnsupportedFileType(
                document.file_type.as_str().to_string(),
            ));
        }

        let data = tokio::fs::read(document.path())
            .await
            .map_err(|source| ExtractionError::Io {
                filename: document.filename.clone(),
                source,
            })?;

        let text = String::from_utf8(data).map_err(|e| ExtractionError::UnreadableEncoding {
            filename: document.filename.clone(),
            reason: e.to_string(),
        })?;

        Ok(vec![ExtractionUnit::new(text, &document.filename, None)])
    }
}
