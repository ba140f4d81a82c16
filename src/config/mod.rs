pub mod credentials;
pub mod parser;
pub mod types;

pub use types::*;
pub use parser::parse_config;
pub use credentials::{resolve_secret, API_KEY_ENV, API_TOKEN_ENV};
