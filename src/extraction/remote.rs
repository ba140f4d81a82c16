use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use crate::errors::BcbError;
use super::{DocumentExtractor, PDF_MIME};

/// Delegates extraction to a running `/api/parse-pdf` endpoint.
pub struct RemoteExtractor {
    client: Client,
    endpoint: String,
}

impl RemoteExtractor {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}/api/parse-pdf", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DocumentExtractor for RemoteExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, BcbError> {
        let part = Part::bytes(bytes.to_vec())
            .file_name("upload.pdf")
            .mime_str(PDF_MIME)
            .map_err(|e| BcbError::Internal(format!("Invalid MIME type: {}", e)))?;
        let form = Form::new().part("file", part);

        let resp = self.client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| BcbError::Network(format!("Extraction request failed: {}", e)))?;

        let status = resp.status();
        let data: Value = resp.json().await
            .map_err(|e| BcbError::Extraction(format!("Failed to parse extraction response: {}", e)))?;

        if !status.is_success() {
            let message = data["error"].as_str().unwrap_or("Failed to parse PDF");
            return Err(BcbError::Extraction(format!("{} ({})", message, status.as_u16())));
        }

        data["text"].as_str()
            .map(str::to_string)
            .ok_or_else(|| BcbError::Extraction("No text in extraction response".into()))
    }

    fn name(&self) -> &str { "remote" }
}
