use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use crate::api;
use crate::cli::commands::ServeArgs;
use crate::config::{resolve_secret, API_TOKEN_ENV};
use crate::errors::BcbError;
use crate::extraction::PdfExtractor;
use tracing::info;

pub async fn handle_serve(args: ServeArgs) -> Result<(), BcbError> {
    let config = super::load_config(args.config.as_deref()).await?;
    let server = config.server.clone().unwrap_or_default();
    let host = args.host.clone().or(server.host).unwrap_or_else(|| "0.0.0.0".to_string());
    let port = args.port.or(server.port).unwrap_or(8080);

    let llm = super::build_provider(&args.llm, &config)?;
    let api_token = resolve_secret(args.api_token.as_deref(), server.api_token.as_deref(), API_TOKEN_ENV);
    info!(
        host = %host,
        port,
        provider = llm.provider_name(),
        model = llm.model_name(),
        auth = api_token.is_some(),
        "Starting API server"
    );

    let state = api::create_app_state(&config, llm, Arc::new(PdfExtractor::new()), api_token);
    let sessions = state.sessions.clone();
    let app = api::build_router(state).layer(CorsLayer::permissive());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    let sweeper_cancel = CancellationToken::new();
    let ttl = config.session_idle_ttl();
    let sweeper = sessions.spawn_idle_sweeper(ttl, sweeper_cancel.clone());
    info!(idle_ttl_secs = ttl.as_secs(), "Idle session sweeper started");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BcbError::Internal(format!("Server error: {}", e)));

    sweeper_cancel.cancel();
    let _ = sweeper.await;
    info!(active = sessions.len(), "Shutting down sessions");
    sessions.shutdown_all().await;
    served
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
