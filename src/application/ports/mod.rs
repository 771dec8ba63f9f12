mod collection_config;
mod distance_metric;
mod embedder;
mod extractor;
mod llm_client;
mod ocr_engine;
mod payload_field_type;
mod payload_index;
mod pdf_rasterizer;
mod pdf_text_layer;
mod prompt_builder;
mod search_result;
mod text_splitter;
mod upload_store;
mod vector_store;
mod vector_store_error;

pub use collection_config::CollectionConfig;
pub use distance_metric::DistanceMetric;
pub use embedder::{Embedder, EmbedderError};
pub use extractor::{ExtractionError, Extractor};
pub use llm_client::{LlmClient, LlmClientError};
pub use ocr_engine::{OcrEngine, OcrError};
pub use payload_field_type::PayloadFieldType;
pub use payload_index::PayloadIndex;
pub use pdf_rasterizer::{PdfRasterizer, RasterizeError};
pub use pdf_text_layer::{PdfTextError, PdfTextLayer};
pub use prompt_builder::PromptBuilder;
pub use search_result::SearchResult;
pub use text_splitter::{TextSplitter, TextSplitterError};
pub use upload_store::{StoredUpload, UploadStore, UploadStoreError};
pub use vector_store::VectorStore;
pub use vector_store_error::VectorStoreError;
