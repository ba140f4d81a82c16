use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use crate::api::models::ErrorResponse;
use crate::api::upload::read_file_field;
use crate::api::AppState;
use tracing::{error, info, warn};

type ErrorReply = (StatusCode, Json<ErrorResponse>);

fn reply(status: StatusCode, message: &str) -> ErrorReply {
    (status, Json(ErrorResponse { error: message.to_string() }))
}

/// Extract the text of an uploaded PDF.
///
/// The content type is not checked here; callers filter non-PDF files
/// before uploading.
pub async fn parse_pdf(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ErrorReply> {
    let mut multipart = multipart.map_err(|e| {
        warn!(error = %e, "Rejected upload: not a multipart form");
        reply(StatusCode::INTERNAL_SERVER_ERROR, "Error parsing form data")
    })?;

    let file = read_file_field(&mut multipart)
        .await
        .map_err(|e| {
            warn!(error = %e, "Error parsing form data");
            reply(StatusCode::INTERNAL_SERVER_ERROR, "Error parsing form data")
        })?
        .ok_or_else(|| reply(StatusCode::BAD_REQUEST, "No file uploaded"))?;

    match state.extractor.extract_text(&file.bytes).await {
        Ok(text) => {
            info!(
                file = file.file_name.as_deref().unwrap_or("-"),
                bytes = file.bytes.len(),
                chars = text.len(),
                "Parsed PDF"
            );
            Ok(Json(json!({ "text": text })))
        }
        Err(e) => {
            error!(extractor = state.extractor.name(), error = %e, "Error parsing PDF");
            Err(reply(StatusCode::INTERNAL_SERVER_ERROR, "Error parsing PDF"))
        }
    }
}

pub async fn method_not_allowed() -> ErrorReply {
    reply(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
