use std::sync::Arc;

use crate::application::ports::UploadStore;
use crate::application::services::{IngestionService, RetrievalService};

/// Process-wide handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub ingestion_service: Arc<IngestionService>,
    pub retrieval_service: Arc<RetrievalService>,
    pub upload_store: Arc<dyn UploadStore>,
}
