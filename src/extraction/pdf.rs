use async_trait::async_trait;
use crate::errors::BcbError;
use super::DocumentExtractor;
use tracing::debug;

/// In-process PDF text extraction.
#[derive(Debug, Default, Clone)]
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, BcbError> {
        if bytes.is_empty() {
            return Err(BcbError::Extraction("Empty document".into()));
        }

        let owned = bytes.to_vec();
        // The parser is CPU-bound and can panic on malformed input; a panic
        // surfaces here as a JoinError.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&owned))
            .await
            .map_err(|e| BcbError::Extraction(format!("PDF parser aborted: {}", e)))?
            .map_err(|e| BcbError::Extraction(format!("Failed to extract PDF text: {}", e)))?;

        debug!(bytes = bytes.len(), chars = text.len(), "Extracted PDF text");
        Ok(text)
    }

    fn name(&self) -> &str { "pdf-extract" }
}
