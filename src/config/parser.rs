use std::path::Path;
use crate::errors::BcbError;
use super::types::AgentConfig;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<AgentConfig, BcbError> {
    if !path.exists() {
        return Err(BcbError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(BcbError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let config: AgentConfig = serde_yaml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Reject settings the demo cannot run with.
fn validate_config(config: &AgentConfig) -> Result<(), BcbError> {
    if let Some(demo) = &config.demo {
        if demo.tick_interval_ms == Some(0) {
            return Err(BcbError::Config("demo.tick_interval_ms must be greater than zero".into()));
        }
        if demo.max_ticks == Some(0) {
            return Err(BcbError::Config("demo.max_ticks must be greater than zero".into()));
        }
    }

    if let Some(llm) = &config.llm {
        if let Some(provider) = &llm.provider {
            if provider != "openai" && provider != "local" {
                return Err(BcbError::Config(format!("Unknown LLM provider: {}", provider)));
            }
        }
        if llm.api_key.as_ref().is_some_and(|k| !k.is_empty()) {
            warn!("API key stored in config file; prefer OPENAI_API_KEY");
        }
    }

    if let Some(server) = &config.server {
        if server.max_upload_bytes == Some(0) {
            return Err(BcbError::Config("server.max_upload_bytes must be greater than zero".into()));
        }
        if server.session_idle_ttl_secs == Some(0) {
            return Err(BcbError::Config("server.session_idle_ttl_secs must be greater than zero".into()));
        }
    }

    Ok(())
}
