mod ingestion_service;
mod prompt;
mod retrieval_service;
mod themes;

pub use ingestion_service::{
    BatchReport, DocumentOutcome, IngestionError, IngestionService, SkipReason,
};
pub use prompt::StuffPromptBuilder;
pub use retrieval_service::{RetrievalError, RetrievalService};
pub use themes::{THEME_COUNT, summarize_themes, top_themes};
