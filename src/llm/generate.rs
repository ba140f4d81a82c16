use super::provider::LLMProvider;
use tracing::{debug, warn};

/// Text substituted for the generation when the provider call fails.
pub const GENERATION_FALLBACK: &str = "An error occurred while generating the completion.";

/// Run a single completion and return its text.
///
/// Failures never propagate: they are logged and replaced by
/// [`GENERATION_FALLBACK`]. There is no retry.
pub async fn generate(provider: &dyn LLMProvider, prompt: &str) -> String {
    debug!(
        provider = provider.provider_name(),
        model = provider.model_name(),
        prompt_len = prompt.len(),
        "Requesting completion"
    );

    match provider.complete(prompt, None).await {
        Ok(response) => {
            debug!(
                model = %response.model,
                output_tokens = ?response.output_tokens,
                "Completion received"
            );
            response.content
        }
        Err(e) => {
            warn!(
                provider = provider.provider_name(),
                error_type = e.error_type(),
                error = %e,
                "Error generating completion"
            );
            GENERATION_FALLBACK.to_string()
        }
    }
}
