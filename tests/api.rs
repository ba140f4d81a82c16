use axum::http::StatusCode;
use axum::body::Body;
use http_body_util::BodyExt;
use tower::ServiceExt;
use serde_json::{json, Value};
use async_trait::async_trait;
use bcb_agent::api::{build_router, create_app_state, AppState};
use bcb_agent::config::{AgentConfig, DemoConfig, ServerConfig};
use bcb_agent::errors::BcbError;
use bcb_agent::extraction::DocumentExtractor;
use bcb_agent::llm::types::LLMResponse;
use bcb_agent::llm::LLMProvider;
use std::sync::Arc;

const BOUNDARY: &str = "bcb-test-boundary";

struct EchoProvider;

#[async_trait]
impl LLMProvider for EchoProvider {
    async fn complete(&self, _prompt: &str, _system: Option<&str>) -> Result<LLMResponse, BcbError> {
        Ok(LLMResponse {
            content: "run: df -h".into(),
            input_tokens: None,
            output_tokens: None,
            model: "echo".into(),
        })
    }
    fn provider_name(&self) -> &str { "echo" }
    fn model_name(&self) -> &str { "echo" }
}

struct StubExtractor(Result<&'static str, &'static str>);

#[async_trait]
impl DocumentExtractor for StubExtractor {
    async fn extract_text(&self, _bytes: &[u8]) -> Result<String, BcbError> {
        self.0.map(str::to_string).map_err(|e| BcbError::Extraction(e.to_string()))
    }
    fn name(&self) -> &str { "stub" }
}

fn test_config(api_token: Option<&str>) -> AgentConfig {
    AgentConfig {
        demo: Some(DemoConfig { splash_delay_ms: Some(0), ..Default::default() }),
        server: Some(ServerConfig {
            max_sessions: Some(2),
            api_token: api_token.map(str::to_string),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn create_test_state_with(extractor: StubExtractor, api_token: Option<&str>) -> AppState {
    let config = test_config(api_token);
    create_app_state(
        &config,
        Arc::new(EchoProvider),
        Arc::new(extractor),
        api_token.map(str::to_string),
    )
}

fn create_test_state() -> AppState {
    create_test_state_with(StubExtractor(Ok("Extracted advisory text")), None)
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn multipart_request(uri: &str, field: &str, content_type: &str, data: &[u8]) -> axum::http::Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"advisory.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
    ).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

async fn create_session(state: &AppState) -> String {
    let response = app(state).oneshot(make_request("POST", "/api/sessions", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response_json(response).await;
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_endpoint() {
    let state = create_test_state();
    let response = app(&state).oneshot(make_request("GET", "/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "bcb-agent");
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_list_phases() {
    let state = create_test_state();
    let response = app(&state).oneshot(make_request("GET", "/api/phases", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    let phases = body.as_array().unwrap();
    assert_eq!(phases.len(), 3);
    assert_eq!(phases[0]["id"], "phase1");
    assert_eq!(phases[0]["status"], "completed");
    assert_eq!(phases[1]["status_label"], "In-progress");
    assert_eq!(phases[2]["number"], 3);
}

#[tokio::test]
async fn test_parse_pdf_returns_text() {
    let state = create_test_state();
    let req = multipart_request("/api/parse-pdf", "file", "application/pdf", b"%PDF-1.4 fake");
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["text"], "Extracted advisory text");
}

#[tokio::test]
async fn test_parse_pdf_without_file_field() {
    let state = create_test_state();
    let req = multipart_request("/api/parse-pdf", "attachment", "application/pdf", b"%PDF");
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["error"], "No file uploaded");
}

#[tokio::test]
async fn test_parse_pdf_rejects_get() {
    let state = create_test_state();
    let response = app(&state).oneshot(make_request("GET", "/api/parse-pdf", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn test_parse_pdf_non_multipart_body() {
    let state = create_test_state();
    let req = make_request("POST", "/api/parse-pdf", Some(json!({"file": "nope"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Error parsing form data");
}

#[tokio::test]
async fn test_parse_pdf_extraction_failure() {
    let state = create_test_state_with(StubExtractor(Err("bad xref table")), None);
    let req = multipart_request("/api/parse-pdf", "file", "application/pdf", b"not really a pdf");
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = response_json(response).await;
    assert_eq!(body["error"], "Error parsing PDF");
}

#[tokio::test]
async fn test_create_get_and_delete_session() {
    let state = create_test_state();
    let id = create_session(&state).await;

    let response = app(&state)
        .oneshot(make_request("GET", &format!("/api/sessions/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["active_phase"], "phase1");
    assert_eq!(body["view"], "home");
    assert_eq!(body["demo_visible"], false);

    let response = app(&state)
        .oneshot(make_request("DELETE", &format!("/api/sessions/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app(&state)
        .oneshot(make_request("GET", &format!("/api/sessions/{}", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_limit() {
    let state = create_test_state();
    create_session(&state).await;
    create_session(&state).await;

    let response = app(&state).oneshot(make_request("POST", "/api/sessions", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response_json(response).await["error"].as_str().unwrap().contains("Session limit"));

    let removed = state.sessions.sweep_idle(std::time::Duration::ZERO).await;
    assert_eq!(removed, 2);
    create_session(&state).await;
}

#[tokio::test]
async fn test_select_phase() {
    let state = create_test_state();
    let id = create_session(&state).await;

    let req = make_request("PUT", &format!("/api/sessions/{}/phase", id), Some(json!({"phase": "phase3"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["active_phase"], "phase3");

    let req = make_request("PUT", &format!("/api/sessions/{}/phase", id), Some(json!({"phase": "phase4"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response_json(response).await["error"].as_str().unwrap().contains("phase4"));

    let snapshot = state.sessions.get(&id).unwrap().snapshot().await;
    assert_eq!(snapshot.active_phase.as_str(), "phase3");
}

#[tokio::test]
async fn test_start_requires_description() {
    let state = create_test_state();
    let id = create_session(&state).await;

    let response = app(&state)
        .oneshot(make_request("POST", &format!("/api/sessions/{}/start", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let snapshot = state.sessions.get(&id).unwrap().snapshot().await;
    assert!(snapshot.remediation_start.is_none());
}

#[tokio::test]
async fn test_document_upload_rejects_non_pdf() {
    let state = create_test_state();
    let id = create_session(&state).await;
    let uri = format!("/api/sessions/{}/document", id);

    let response = app(&state)
        .oneshot(multipart_request(&uri, "file", "application/pdf", b"%PDF-1.4"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["processed"], true);
    assert_eq!(body["chars"], 23);

    let response = app(&state)
        .oneshot(multipart_request(&uri, "file", "text/plain", b"hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let snapshot = state.sessions.get(&id).unwrap().snapshot().await;
    assert_eq!(snapshot.document_text.as_deref(), Some("Extracted advisory text"));
}

#[tokio::test]
async fn test_feedback_before_start() {
    let state = create_test_state();
    let id = create_session(&state).await;

    let req = make_request("POST", &format!("/api/sessions/{}/feedback", id), Some(json!({"positive": true})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_remediation_flow() {
    let state = create_test_state();
    let id = create_session(&state).await;

    let req = make_request(
        "PUT",
        &format!("/api/sessions/{}/bug-description", id),
        Some(json!({"text": "disk full on host A"})),
    );
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let system_info = axum::http::Request::builder()
        .method("PUT")
        .uri(format!("/api/sessions/{}/system-info", id))
        .header("content-type", "text/plain")
        .body(Body::from("Ubuntu 22.04\nkernel 5.15"))
        .unwrap();
    let response = app(&state).oneshot(system_info).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["system_info"], "Ubuntu 22.04\nkernel 5.15");

    let response = app(&state)
        .oneshot(make_request("POST", &format!("/api/sessions/{}/start", id), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    assert_eq!(response_json(response).await["loading"], true);

    state.sessions.get(&id).unwrap().idle().await;

    let response = app(&state)
        .oneshot(make_request("GET", &format!("/api/sessions/{}", id), None))
        .await
        .unwrap();
    let body = response_json(response).await;
    assert_eq!(body["view"], "remediation");
    assert_eq!(body["demo_visible"], true);
    assert_eq!(body["outputs"][0]["phase"], "phase1");
    assert_eq!(body["outputs"][0]["suggestion"], "run: df -h");

    let req = make_request("POST", &format!("/api/sessions/{}/feedback", id), Some(json!({"positive": true})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let ttr = response_json(response).await;
    let with = ttr["ttr_with_system_secs"].as_f64().unwrap();
    let without = ttr["ttr_without_system_secs"].as_f64().unwrap();
    assert!(with >= 0.0);
    assert!(without >= with * 1.5);

    let snapshot = state.sessions.get(&id).unwrap().snapshot().await;
    assert!(!snapshot.demo_visible);
    assert!(snapshot.ttr.is_some());
}

#[tokio::test]
async fn test_set_view() {
    let state = create_test_state();
    let id = create_session(&state).await;

    let req = make_request("PUT", &format!("/api/sessions/{}/view", id), Some(json!({"view": "remediation"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response_json(response).await["view"], "remediation");
}

#[tokio::test]
async fn test_api_token_required() {
    let state = create_test_state_with(StubExtractor(Ok("text")), Some("s3cret"));

    let response = app(&state).oneshot(make_request("POST", "/api/sessions", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/sessions")
        .header("Authorization", "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/api/sessions")
        .header("Authorization", "Bearer s3cret")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Health stays open.
    let response = app(&state).oneshot(make_request("GET", "/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
