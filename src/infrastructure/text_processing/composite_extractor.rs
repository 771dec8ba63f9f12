use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{ExtractionError, Extractor};
use crate::domain::{Document, ExtractionUnit, FileType};

/// Dispatches to the extractor registered for the document's file type.
/// Types without a registered extractor yield no units.
pub struct CompositeExtractor {
    adapters: HashMap<FileType, Arc<dyn Extractor>>,
}

impl CompositeExtractor {
    pub fn new(adapters: Vec<(FileType, Arc<dyn Extractor>)>) -> Self {
        Self {
            adapters: adapters.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Extractor for CompositeExtractor {
    async fn extract(&self, document: &Document) -> Result<Vec<ExtractionUnit>, ExtractionError> {
        match self.adapters.get(&document.file_type) {
            Some(adapter) => adapter.extract(document).await,
            None => {
                tracing::warn!(
                    filename = %document.filename,
                    file_type = document.file_type.as_str(),
                    "No extractor registered, skipping"
                );
                Ok(Vec::new())
            }
        }
    }
}
