use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use crate::errors::BcbError;
use super::provider::LLMProvider;
use super::types::{chat_messages, LLMResponse};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIProvider {
    pub fn new(api_key: &str, model: Option<&str>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: &str, model: Option<&str>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.unwrap_or(DEFAULT_MODEL).to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// Pull the completion text and token usage out of a chat-completions body.
pub(crate) fn parse_chat_completion(data: &Value, model: &str) -> Result<LLMResponse, BcbError> {
    if let Some(error) = data.get("error") {
        return Err(BcbError::LLMApi(error["message"].as_str().unwrap_or("Unknown").to_string()));
    }

    let content = data["choices"][0]["message"]["content"].as_str()
        .ok_or_else(|| BcbError::LLMApi("No content in completion response".into()))?
        .to_string();

    Ok(LLMResponse {
        content,
        input_tokens: data["usage"]["prompt_tokens"].as_u64(),
        output_tokens: data["usage"]["completion_tokens"].as_u64(),
        model: model.to_string(),
    })
}

#[async_trait]
impl LLMProvider for OpenAIProvider {
    async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<LLMResponse, BcbError> {
        let body = json!({
            "model": self.model,
            "messages": chat_messages(prompt, system),
        });

        let resp = self.client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| BcbError::Network(format!("OpenAI request failed: {}", e)))?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(BcbError::RateLimit("OpenAI rate limit".into()));
        }
        if status.as_u16() == 401 {
            return Err(BcbError::Authentication("Invalid OpenAI API key".into()));
        }

        let data: Value = resp.json().await
            .map_err(|e| BcbError::LLMApi(format!("Failed to parse OpenAI response: {}", e)))?;

        parse_chat_completion(&data, &self.model)
    }

    fn provider_name(&self) -> &str { "openai" }
    fn model_name(&self) -> &str { &self.model }
}
