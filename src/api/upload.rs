use axum::body::Bytes;
use axum::extract::multipart::{Multipart, MultipartError};

/// Multipart form field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

pub struct UploadedFile {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

/// Read the `file` field of a multipart form, skipping any other fields.
///
/// A field with an empty file name and no content (a form submitted with
/// no file chosen) counts as absent.
pub async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;

        if bytes.is_empty() && file_name.as_deref().map_or(true, str::is_empty) {
            return Ok(None);
        }
        return Ok(Some(UploadedFile { bytes, content_type, file_name }));
    }
    Ok(None)
}
