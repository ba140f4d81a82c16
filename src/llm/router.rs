use crate::errors::BcbError;
use super::provider::LLMProvider;
use super::openai::OpenAIProvider;
use super::local::LocalProvider;

pub fn create_provider(
    provider_name: &str,
    api_key: &str,
    model: Option<&str>,
    base_url: Option<&str>,
) -> Result<Box<dyn LLMProvider>, BcbError> {
    match provider_name {
        "openai" => {
            if api_key.is_empty() {
                return Err(BcbError::Config(
                    "OpenAI provider requires an API key (--api-key or OPENAI_API_KEY)".into(),
                ));
            }
            match base_url {
                Some(url) => Ok(Box::new(OpenAIProvider::with_base_url(api_key, model, url))),
                None => Ok(Box::new(OpenAIProvider::new(api_key, model))),
            }
        }
        "local" => Ok(Box::new(LocalProvider::new(base_url, model, api_key))),
        _ => Err(BcbError::Config(format!("Unknown LLM provider: {}", provider_name))),
    }
}
