pub mod builder;

pub use builder::{build_prompt, empty_result_fallback, is_ready, split_steps, PromptVariables};
