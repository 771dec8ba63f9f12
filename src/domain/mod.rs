mod answer;
mod chunk;
mod document;
mod embedding;
mod extraction_unit;
mod storage_path;

pub use answer::{Answer, EXCERPT_MAX_CHARS, SourceDescriptor};
pub use chunk::{Chunk, ChunkId, DocumentId};
pub use document::{Document, FileType};
pub use embedding::Embedding;
pub use extraction_unit::ExtractionUnit;
pub use storage_path::StoragePath;
