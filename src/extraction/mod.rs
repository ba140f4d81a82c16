pub mod pdf;
pub mod remote;

use async_trait::async_trait;
use crate::errors::BcbError;

pub use pdf::PdfExtractor;
pub use remote::RemoteExtractor;

/// MIME type accepted for document uploads.
pub const PDF_MIME: &str = "application/pdf";

/// Turns an uploaded binary document into plain text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, BcbError>;

    /// Extractor name for logging
    fn name(&self) -> &str;
}
