use crate::cli::commands::ExtractArgs;
use crate::errors::BcbError;
use crate::extraction::{DocumentExtractor, PdfExtractor};
use tracing::info;

pub async fn handle_extract(args: ExtractArgs) -> Result<(), BcbError> {
    let bytes = tokio::fs::read(&args.pdf).await?;
    info!(path = %args.pdf.display(), bytes = bytes.len(), "Extracting PDF text");
    let text = PdfExtractor::new().extract_text(&bytes).await?;
    println!("{}", text);
    Ok(())
}
