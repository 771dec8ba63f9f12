mod health;
mod query;
mod root;
mod upload;

pub use health::health_handler;
pub use query::{LocatorValue, QueryRequest, QueryResponse, SourceResponse, query_handler};
pub use root::root_handler;
pub use upload::{UploadResponse, upload_handler};

use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
