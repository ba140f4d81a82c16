use thiserror::Error;

#[derive(Debug, Error)]
pub enum BcbError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BcbError {
    /// Stable label used in structured log fields.
    pub fn error_type(&self) -> &'static str {
        match self {
            BcbError::Config(_) => "ConfigError",
            BcbError::Validation(_) => "ValidationError",
            BcbError::Extraction(_) => "ExtractionError",
            BcbError::LLMApi(_) => "GenerationError",
            BcbError::RateLimit(_) => "RateLimitError",
            BcbError::Authentication(_) => "AuthenticationError",
            BcbError::Network(_) => "NetworkError",
            BcbError::NotFound(_) => "NotFoundError",
            BcbError::Unavailable(_) => "UnavailableError",
            BcbError::Internal(_) => "InternalError",
            BcbError::Io(_) => "IoError",
            BcbError::Json(_) => "JsonError",
            BcbError::Yaml(_) => "YamlError",
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            BcbError::Config(_) | BcbError::Yaml(_) => 2,
            BcbError::Validation(_) => 3,
            BcbError::Extraction(_) => 4,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_failures_are_labelled() {
        let err = BcbError::LLMApi("no content".into());
        assert_eq!(err.error_type(), "GenerationError");
        assert_eq!(err.to_string(), "LLM API error: no content");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BcbError::Config("bad".into()).exit_code(), 2);
        assert_eq!(BcbError::Validation("empty".into()).exit_code(), 3);
        assert_eq!(BcbError::Extraction("corrupt".into()).exit_code(), 4);
        assert_eq!(BcbError::Network("refused".into()).exit_code(), 1);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: BcbError = io.into();
        assert_eq!(err.error_type(), "IoError");
    }
}
