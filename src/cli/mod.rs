pub mod commands;
pub mod serve;
pub mod phases;
pub mod remediate;
pub mod extract;
pub mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::config::{self, resolve_secret, AgentConfig, API_KEY_ENV};
use crate::errors::BcbError;
use crate::llm::{self, LLMProvider};

pub use commands::{Cli, Commands, LlmArgs};

/// Load the config file when one is given, defaults otherwise.
pub async fn load_config(path: Option<&str>) -> Result<AgentConfig, BcbError> {
    match path {
        Some(p) => config::parse_config(&PathBuf::from(p)).await,
        None => Ok(AgentConfig::default()),
    }
}

/// Build the text-generation provider. Flags win over the config file.
pub fn build_provider(args: &LlmArgs, config: &AgentConfig) -> Result<Arc<dyn LLMProvider>, BcbError> {
    let file = config.llm.clone().unwrap_or_default();
    let provider = args.provider.clone()
        .or(file.provider)
        .unwrap_or_else(|| "openai".to_string());
    let model = args.model.clone().or(file.model);
    let base_url = args.base_url.clone().or(file.base_url);
    let api_key = resolve_secret(args.api_key.as_deref(), file.api_key.as_deref(), API_KEY_ENV)
        .unwrap_or_default();

    let provider = llm::create_provider(&provider, &api_key, model.as_deref(), base_url.as_deref())?;
    Ok(Arc::from(provider))
}

/// MIME type a browser would report for `path`, judged by extension.
pub fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") | Some("log") => "text/plain",
        _ => "application/octet-stream",
    }
}
