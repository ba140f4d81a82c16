pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod llm;
pub mod phases;
pub mod prompts;
pub mod session;
