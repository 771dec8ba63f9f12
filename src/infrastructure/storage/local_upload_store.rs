use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};

use crate::application::ports::{StoredUpload, UploadStore, UploadStoreError};
use crate::domain::StoragePath;

/// Upload directory on the local filesystem. Bytes are streamed through a
/// multipart upload so large files never sit fully in memory.
pub struct LocalUploadStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalUploadStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, UploadStoreError> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| UploadStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[async_trait::async_trait]
impl UploadStore for LocalUploadStore {
    #[tracing::instrument(skip(self, stream), fields(path = %path))]
    async fn store(
        &self,
        path: &StoragePath,
        mut stream: BoxStream<'_, Result<Bytes, io::Error>>,
    ) -> Result<StoredUpload, UploadStoreError> {
        let store_path = StorePath::from(path.as_str());
        let mut upload = self
            .inner
            .put_multipart(&store_path)
            .await
            .map_err(|e| UploadStoreError::UploadFailed(e.to_string()))?;

        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let bytes = match chunk {
                Ok(b) => b,
                Err(e) => {
                    let _ = upload.abort().await;
                    return Err(UploadStoreError::Io(e));
                }
            };
            if bytes.is_empty() {
                continue;
            }
            total_bytes += bytes.len() as u64;
            if let Err(e) = upload.put_part(PutPayload::from(bytes)).await {
                let _ = upload.abort().await;
                return Err(UploadStoreError::UploadFailed(e.to_string()));
            }
        }

        upload
            .complete()
            .await
            .map_err(|e| UploadStoreError::UploadFailed(e.to_string()))?;

        let on_disk = self
            .inner
            .path_to_filesystem(&store_path)
            .map_err(|e| UploadStoreError::UploadFailed(e.to_string()))?;

        tracing::debug!(size_bytes = total_bytes, "upload stored");

        Ok(StoredUpload {
            path: on_disk,
            size_bytes: total_bytes,
        })
    }
}
