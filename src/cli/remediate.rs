use std::sync::Arc;
use tokio::sync::mpsc;
use crate::cli::commands::RemediateArgs;
use crate::errors::BcbError;
use crate::extraction::{DocumentExtractor, PdfExtractor, RemoteExtractor};
use crate::session::DemoSession;
use super::render;
use tracing::info;

pub async fn handle_remediate(args: RemediateArgs) -> Result<(), BcbError> {
    let config = super::load_config(args.config.as_deref()).await?;
    let llm = super::build_provider(&args.llm, &config)?;
    let extractor: Arc<dyn DocumentExtractor> = match &args.extract_url {
        Some(url) => Arc::new(RemoteExtractor::new(url)),
        None => Arc::new(PdfExtractor::new()),
    };

    let (tx, rx) = mpsc::unbounded_channel();
    let renderer = tokio::spawn(render::render_events(rx));
    let session = DemoSession::new(llm, extractor, config.timing()).with_event_channel(tx);
    info!(session = %session.id(), phase = %args.phase, "Running remediation demo");

    let result = run_session(&session, &args).await;
    session.shutdown().await;
    drop(session);
    let _ = renderer.await;
    result
}

async fn run_session(session: &DemoSession, args: &RemediateArgs) -> Result<(), BcbError> {
    session.select_phase(&args.phase).await?;
    session.set_bug_description(args.bug.clone()).await?;

    if let Some(path) = &args.system_info {
        let contents = tokio::fs::read_to_string(path).await?;
        session.upload_system_info(contents).await?;
    }
    if let Some(path) = &args.pdf {
        let bytes = tokio::fs::read(path).await?;
        session.upload_document(&bytes, super::mime_for(path)).await?;
    }

    session.start_remediation().await?;
    session.idle().await;

    render::print_outputs(&session.snapshot().await);
    let ttr = session.submit_feedback(!args.thumbs_down).await?;
    render::print_ttr(&ttr);
    Ok(())
}
