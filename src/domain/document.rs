use std::path::{Path, PathBuf};

use super::chunk::DocumentId;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    pub file_type: FileType,
    pub storage_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Pdf,
    Image,
    Text,
    Unsupported,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "png" | "jpg" | "jpeg" => Self::Image,
            "txt" => Self::Text,
            _ => Self::Unsupported,
        }
    }

    /// Detects the type from the text after the last `.` of a filename.
    pub fn from_filename(filename: &str) -> Self {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| Self::from_extension(ext))
            .unwrap_or(Self::Unsupported)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Text => "text",
            Self::Unsupported => "unsupported",
        }
    }
}

impl Document {
    pub fn new(filename: String, storage_path: PathBuf) -> Self {
        let file_type = FileType::from_filename(&filename);
        Self::with_id(DocumentId::new(), filename, file_type, storage_path)
    }

    pub fn with_id(
        id: DocumentId,
        filename: String,
        file_type: FileType,
        storage_path: PathBuf,
    ) -> Self {
        Self {
            id,
            filename,
            file_type,
            storage_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }
}
