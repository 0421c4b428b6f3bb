// Reading the `file` field of a multipart request

use actix_multipart::Multipart;
use futures::StreamExt;

use crate::error::FileError;
use crate::model::constants::FILE_FIELD;

/// A file read from a multipart body
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Read the first `file` field, failing with [`FileError::TooLarge`] as soon
/// as more than `max_size` bytes arrive. Other fields are skipped.
pub async fn read_file(
    mut payload: Multipart,
    max_size: usize,
) -> Result<Option<UploadedFile>, FileError> {
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| FileError::Malformed(e.to_string()))?;

        let Some(content_disposition) = field.content_disposition() else {
            continue;
        };
        if content_disposition.get_name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = content_disposition.get_filename().map(str::to_string);
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| FileError::Malformed(e.to_string()))?;
            if bytes.len() + chunk.len() > max_size {
                tracing::debug!(max_size, "Rejected oversized upload");
                return Err(FileError::TooLarge);
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }));
    }

    Ok(None)
}
