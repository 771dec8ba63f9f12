use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::application::services::RetrievalError;
use crate::domain::{Answer, SourceDescriptor};
use crate::infrastructure::observability::sanitize_prompt;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

#[derive(Serialize)]
pub struct QueryResponse {
    pub answer: String,
    pub sources: Vec<SourceResponse>,
    pub themes: String,
}

#[derive(Serialize)]
pub struct SourceResponse {
    pub document: String,
    pub page: LocatorValue,
    pub content: String,
    pub paragraph: LocatorValue,
}

/// Page or paragraph number, rendered as `"N/A"` when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum LocatorValue {
    Known(u32),
    Unknown(&'static str),
}

impl From<Option<u32>> for LocatorValue {
    fn from(value: Option<u32>) -> Self {
        value.map_or(Self::Unknown(NOT_AVAILABLE), Self::Known)
    }
}

impl From<SourceDescriptor> for SourceResponse {
    fn from(source: SourceDescriptor) -> Self {
        let document = if source.document.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            source.document
        };
        Self {
            document,
            page: source.page.into(),
            content: source.content,
            paragraph: source.paragraph.into(),
        }
    }
}

impl From<Answer> for QueryResponse {
    fn from(answer: Answer) -> Self {
        Self {
            answer: answer.answer,
            sources: answer.sources.into_iter().map(SourceResponse::from).collect(),
            themes: answer.themes,
        }
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    tracing::debug!(question = %sanitize_prompt(&request.question), "Processing query");

    match state.retrieval_service.query(&request.question).await {
        Ok(answer) => {
            tracing::info!(sources_count = answer.sources.len(), "Query successful");
            (StatusCode::OK, Json(QueryResponse::from(answer))).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Query failed");
            let status = match e {
                RetrievalError::Search(_) => StatusCode::SERVICE_UNAVAILABLE,
                RetrievalError::Embedding(_) | RetrievalError::Completion(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            (
                status,
                Json(ErrorResponse {
                    error: format!("Query failed: {}", e),
                }),
            )
                .into_response()
        }
    }
}
