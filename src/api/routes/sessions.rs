use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use crate::api::models::{
    BugDescriptionRequest, FeedbackRequest, SelectPhaseRequest, TtrResponse, ViewRequest,
};
use crate::api::upload::read_file_field;
use crate::api::AppState;
use crate::errors::BcbError;
use crate::session::SessionSnapshot;

pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionSnapshot>), BcbError> {
    let session = state.sessions.create()?;
    Ok((StatusCode::CREATED, Json(session.snapshot().await)))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, BcbError> {
    let session = state.sessions.get(&id)?;
    Ok(Json(session.snapshot().await))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, BcbError> {
    state.sessions.remove(&id).await?;
    Ok(Json(json!({"deleted": true})))
}

pub async fn select_phase(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SelectPhaseRequest>,
) -> Result<Json<SessionSnapshot>, BcbError> {
    let session = state.sessions.get(&id)?;
    session.select_phase(&req.phase).await?;
    Ok(Json(session.snapshot().await))
}

pub async fn set_bug_description(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<BugDescriptionRequest>,
) -> Result<Json<SessionSnapshot>, BcbError> {
    let session = state.sessions.get(&id)?;
    session.set_bug_description(req.text).await?;
    Ok(Json(session.snapshot().await))
}

/// The request body is the raw text of the system-info file.
pub async fn upload_system_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<Json<SessionSnapshot>, BcbError> {
    let session = state.sessions.get(&id)?;
    session.upload_system_info(body).await?;
    Ok(Json(session.snapshot().await))
}

pub async fn upload_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, BcbError> {
    let session = state.sessions.get(&id)?;
    let mut multipart = multipart
        .map_err(|e| BcbError::Validation(format!("Expected a multipart form: {}", e)))?;
    let file = read_file_field(&mut multipart)
        .await
        .map_err(|e| BcbError::Internal(format!("Error parsing form data: {}", e)))?
        .ok_or_else(|| BcbError::Validation("No file uploaded".into()))?;

    let chars = session
        .upload_document(&file.bytes, file.content_type.as_deref().unwrap_or(""))
        .await?;
    Ok(Json(json!({"processed": true, "chars": chars})))
}

pub async fn set_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ViewRequest>,
) -> Result<Json<SessionSnapshot>, BcbError> {
    let session = state.sessions.get(&id)?;
    session.show_view(req.view).await?;
    Ok(Json(session.snapshot().await))
}

pub async fn start_remediation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<SessionSnapshot>), BcbError> {
    let session = state.sessions.get(&id)?;
    session.start_remediation().await?;
    Ok((StatusCode::ACCEPTED, Json(session.snapshot().await)))
}

pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<TtrResponse>, BcbError> {
    let session = state.sessions.get(&id)?;
    let ttr = session.submit_feedback(req.positive).await?;
    Ok(Json(TtrResponse {
        ttr_with_system_secs: ttr.with_system_secs,
        ttr_without_system_secs: ttr.without_system_secs,
        improvement_pct: ttr.improvement_pct(),
    }))
}
