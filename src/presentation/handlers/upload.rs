use std::io;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use serde::Serialize;

use crate::domain::{Document, DocumentId, FileType, StoragePath};
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub status: String,
    pub indexed: usize,
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorResponse { error })).into_response()
}

/// Stores every file part of the multipart body, then ingests them in order.
///
/// Per-file failures are skips visible only in logs; the response carries the
/// number of files that reached the index.
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut documents: Vec<Document> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    format!("Failed to read multipart: {}", e),
                );
            }
        };

        let Some(filename) = field.file_name().map(str::to_string) else {
            tracing::debug!(field = ?field.name(), "Ignoring non-file multipart field");
            continue;
        };

        let document_id = DocumentId::new();
        let storage_path = StoragePath::new(&document_id, &filename);
        let stream = Box::pin(field.map_err(io::Error::other));

        let stored = match state.upload_store.store(&storage_path, stream).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(error = %e, filename = %filename, "Failed to store upload");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to store {}: {}", filename, e),
                );
            }
        };

        let file_type = FileType::from_filename(&filename);
        tracing::debug!(
            filename = %filename,
            file_type = file_type.as_str(),
            size_bytes = stored.size_bytes,
            "Upload stored"
        );

        documents.push(Document::with_id(
            document_id,
            filename,
            file_type,
            stored.path,
        ));
    }

    if documents.is_empty() {
        tracing::warn!("Upload request with no file");
        return error_response(StatusCode::BAD_REQUEST, "No file uploaded".to_string());
    }

    match state.ingestion_service.ingest_batch(&documents).await {
        Ok(report) => {
            let indexed = report.indexed_count();
            tracing::info!(
                files = documents.len(),
                indexed,
                chunks = report.chunk_count(),
                "Upload request completed"
            );
            (
                StatusCode::OK,
                Json(UploadResponse {
                    status: format!("{} files uploaded and indexed", indexed),
                    indexed,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Index unavailable during upload");
            error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Indexing failed: {}", e),
            )
        }
    }
}
