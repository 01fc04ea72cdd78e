//! Turns a user-selected file into something the rest of the stylist can use.
//!
//! - `encode_upload` validates raw bytes, allocates a preview and base64-encodes
//!   the content for the outbound request body.
//! - `encode_path` does the same for a file on disk (CLI).
//! - `EncodedImage` converts to and from `data:<mime>;base64,<data>` URIs, the
//!   image reference format used by generated outfits.
pub mod preview;

use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Serialize;

use crate::error::{AppError, AppResult};

pub use preview::{PreviewHandle, PreviewRegistry};

/// The raw file as selected by the user.
#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// Base64 payload plus its MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime_type: String,
    pub data: String,
}

impl EncodedImage {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        EncodedImage { mime_type: mime_type.into(), data: BASE64.encode(bytes) }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn from_data_uri(uri: &str) -> AppResult<Self> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| AppError::ImageReference("expected a data: URI".to_string()))?;
        let (meta, data) = rest
            .split_once(',')
            .ok_or_else(|| AppError::ImageReference("data URI has no payload".to_string()))?;
        let mime_type = meta
            .strip_suffix(";base64")
            .ok_or_else(|| AppError::ImageReference("data URI is not base64 encoded".to_string()))?;
        if data.is_empty() {
            return Err(AppError::ImageReference("data URI payload is empty".to_string()));
        }
        let mime_type = if mime_type.is_empty() { "image/png" } else { mime_type };
        Ok(EncodedImage { mime_type: mime_type.to_string(), data: data.to_string() })
    }

    pub fn decode(&self) -> AppResult<Vec<u8>> {
        BASE64
            .decode(self.data.as_bytes())
            .map_err(|e| AppError::ImageReference(format!("base64 decode failed: {}", e)))
    }
}

/// A processed upload: immutable once created, replaced wholesale on re-upload.
#[derive(Clone, Debug)]
pub struct UploadedItem {
    pub file: Arc<UploadedFile>,
    pub preview: PreviewHandle,
    pub encoded: EncodedImage,
}

pub async fn encode_upload(
    previews: &PreviewRegistry,
    file_name: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> AppResult<UploadedItem> {
    if bytes.is_empty() {
        return Err(AppError::Input(format!("'{}' is empty", file_name)));
    }
    let mime_type = resolve_mime(file_name, content_type)
        .ok_or_else(|| AppError::Input(format!("'{}' is not a supported image", file_name)))?;
    let encoded = EncodedImage::from_bytes(mime_type.clone(), &bytes);
    tracing::debug!(file = %file_name, mime = %mime_type, bytes = bytes.len(), "Encoded upload");

    let file = Arc::new(UploadedFile { name: file_name.to_string(), mime_type, bytes });
    let preview = previews.allocate(file.clone()).await;
    Ok(UploadedItem { file, preview, encoded })
}

pub async fn encode_path(previews: &PreviewRegistry, path: &Path) -> AppResult<UploadedItem> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::Input(format!("cannot read {}: {}", path.display(), e)))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    encode_upload(previews, &name, None, bytes).await
}

fn resolve_mime(file_name: &str, content_type: Option<&str>) -> Option<String> {
    let declared = content_type
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().to_ascii_lowercase())
        .filter(|ct| ct.starts_with("image/") && ct.len() > "image/".len());
    declared.or_else(|| mime_for_name(file_name).map(str::to_string))
}

pub fn mime_for_name(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

/// File extension for an image MIME type, `png` when unknown.
pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/heic" => "heic",
        "image/heif" => "heif",
        _ => "png",
    }
}
