use std::path::Path;

use crate::errors::AppError;

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// What the upload control knows about a picked file before any decoding happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub media_type: String,
    pub size: u64,
}

impl ImageUpload {
    /// Media type is sniffed from the leading bytes rather than trusted from the extension.
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Self {
        let media_type = infer::get(bytes)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| FALLBACK_MEDIA_TYPE.to_string());

        ImageUpload {
            file_name: file_name.into(),
            media_type,
            size: bytes.len() as u64,
        }
    }

    pub fn file_name_of(path: &Path) -> String {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }

    pub fn validate(&self, max_bytes: u64) -> Result<(), AppError> {
        if !self.media_type.starts_with("image/") {
            return Err(AppError::validation("file", "Please select an image file"));
        }
        if self.size > max_bytes {
            let limit_mb = max_bytes / (1024 * 1024);
            return Err(AppError::validation(
                "file",
                format!("Image size should be less than {}MB", limit_mb.max(1)),
            ));
        }
        Ok(())
    }
}

/// Reads a picked file and checks it the way the upload control does.
pub async fn read_upload(path: &Path, max_bytes: u64) -> Result<(ImageUpload, Vec<u8>), AppError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::IoError(format!("{}: {}", path.display(), e)))?;

    let upload = ImageUpload::from_bytes(ImageUpload::file_name_of(path), &bytes);
    upload.validate(max_bytes)?;

    Ok((upload, bytes))
}
