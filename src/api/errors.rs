use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::errors::{ErrorCategory, ReportError};
use crate::pipeline::GenerationFailure;

fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Network => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCategory::Export => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for GenerationFailure {
    fn into_response(self) -> axum::response::Response {
        let status = status_for(self.classification.category);
        let body = json!({
            "error": self.classification.message,
            "category": self.classification.category.as_str(),
            "sources": self.sources,
        });
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> axum::response::Response {
        if self.is_local() {
            let status = match &self {
                ReportError::Config(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            return (status, Json(json!({"error": self.to_string()}))).into_response();
        }
        GenerationFailure::new(self, Vec::new()).into_response()
    }
}
