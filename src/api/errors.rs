use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use crate::errors::BcbError;

impl IntoResponse for BcbError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            BcbError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            BcbError::Config(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            BcbError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            BcbError::Authentication(_) => (StatusCode::UNAUTHORIZED, self.to_string()),
            BcbError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        (status, Json(json!({"error": message}))).into_response()
    }
}
