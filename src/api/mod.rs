pub mod routes;
pub mod models;
pub mod errors;
pub mod auth;
pub mod upload;

use std::sync::Arc;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;
use crate::config::AgentConfig;
use crate::extraction::DocumentExtractor;
use crate::llm::LLMProvider;
use crate::session::SessionManager;

#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub api_token: Option<String>,
    pub max_upload_bytes: usize,
}

pub fn create_app_state(
    config: &AgentConfig,
    llm: Arc<dyn LLMProvider>,
    extractor: Arc<dyn DocumentExtractor>,
    api_token: Option<String>,
) -> AppState {
    let mut sessions = SessionManager::new(llm, extractor.clone(), config.timing());
    if let Some(max) = config.server.as_ref().and_then(|s| s.max_sessions) {
        sessions = sessions.with_max_sessions(max);
    }
    AppState {
        sessions,
        extractor,
        api_token,
        max_upload_bytes: config.max_upload_bytes(),
    }
}

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/parse-pdf", post(routes::parse_pdf::parse_pdf).fallback(routes::parse_pdf::method_not_allowed))
        .route("/api/sessions", post(routes::sessions::create_session))
        .route("/api/sessions/{id}", get(routes::sessions::get_session).delete(routes::sessions::delete_session))
        .route("/api/sessions/{id}/phase", put(routes::sessions::select_phase))
        .route("/api/sessions/{id}/bug-description", put(routes::sessions::set_bug_description))
        .route("/api/sessions/{id}/system-info", put(routes::sessions::upload_system_info))
        .route("/api/sessions/{id}/document", post(routes::sessions::upload_document))
        .route("/api/sessions/{id}/view", put(routes::sessions::set_view))
        .route("/api/sessions/{id}/start", post(routes::sessions::start_remediation))
        .route("/api/sessions/{id}/feedback", post(routes::sessions::submit_feedback))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::api_auth_middleware));

    Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/phases", get(routes::phases::list_phases))
        .merge(protected)
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
