pub mod provider;
pub mod openai;
pub mod local;
pub mod router;
pub mod types;
pub mod generate;

pub use provider::LLMProvider;
pub use router::create_provider;
pub use types::LLMResponse;
pub use generate::{generate, GENERATION_FALLBACK};
