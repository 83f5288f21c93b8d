// ── Attachments ──
//
// Validation happens here, at the boundary, before the assistant or the
// ticket store ever sees the file.

use std::fs;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDateTime;

use crate::error::CoreError;
use crate::model::AttachmentRef;

/// 10 MiB.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
];

/// A validated, base64-encoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    data: String,
}

impl Attachment {
    pub fn from_bytes(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: &[u8],
    ) -> Result<Self, CoreError> {
        let file_name = file_name.into();
        let mime_type = mime_type.into().to_ascii_lowercase();

        check_mime(&file_name, &mime_type)?;
        let size_bytes = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
        check_size(&file_name, size_bytes)?;

        Ok(Self {
            data: STANDARD.encode(bytes),
            file_name,
            mime_type,
            size_bytes,
        })
    }

    /// Read and validate a file, inferring the MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());

        let mime_type = mime_from_extension(path).ok_or_else(|| CoreError::Attachment {
            message: format!(
                "{file_name}: unsupported file type (allowed: JPEG, PNG, GIF, WebP, PDF)"
            ),
        })?;

        let meta = fs::metadata(path).map_err(|e| CoreError::Attachment {
            message: format!("{file_name}: {e}"),
        })?;
        check_size(&file_name, meta.len())?;

        let bytes = fs::read(path).map_err(|e| CoreError::Attachment {
            message: format!("{file_name}: {e}"),
        })?;
        Self::from_bytes(file_name, mime_type, &bytes)
    }

    /// Base64 payload.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Whether the provider accepts this type as an inline part.
    pub fn is_inline_supported(&self) -> bool {
        self.mime_type.starts_with("image/") || self.mime_type == "application/pdf"
    }

    /// Metadata for storing on a ticket; the store assigns the id.
    pub fn to_ref(&self, added_at: NaiveDateTime) -> AttachmentRef {
        AttachmentRef {
            id: String::new(),
            name: self.file_name.clone(),
            mime_type: self.mime_type.clone(),
            size_bytes: self.size_bytes,
            added_at,
            data: Some(self.data.clone()),
        }
    }
}

pub fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

fn check_mime(file_name: &str, mime_type: &str) -> Result<(), CoreError> {
    if ALLOWED_MIME_TYPES.contains(&mime_type) {
        Ok(())
    } else {
        Err(CoreError::Attachment {
            message: format!("{file_name}: type {mime_type} is not allowed"),
        })
    }
}

fn check_size(file_name: &str, size: u64) -> Result<(), CoreError> {
    if size > MAX_ATTACHMENT_BYTES {
        Err(CoreError::Attachment {
            message: format!("{file_name}: {size} bytes exceeds the 10 MiB limit"),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encodes_allowed_types() {
        let a = Attachment::from_bytes("shot.PNG", "IMAGE/PNG", b"hello").unwrap();
        assert_eq!(a.mime_type, "image/png");
        assert_eq!(a.data(), "aGVsbG8=");
        assert_eq!(a.size_bytes, 5);
        assert!(a.is_inline_supported());
    }

    #[test]
    fn rejects_disallowed_mime() {
        let err = Attachment::from_bytes("notes.txt", "text/plain", b"x").unwrap_err();
        assert!(matches!(err, CoreError::Attachment { .. }));
    }

    #[test]
    fn rejects_oversized_payload() {
        let big = vec![0u8; usize::try_from(MAX_ATTACHMENT_BYTES).unwrap() + 1];
        assert!(Attachment::from_bytes("scan.pdf", "application/pdf", &big).is_err());
    }

    #[test]
    fn from_path_infers_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invoice.pdf");
        fs::write(&path, b"%PDF-1.7").unwrap();

        let a = Attachment::from_path(&path).unwrap();
        assert_eq!(a.file_name, "invoice.pdf");
        assert_eq!(a.mime_type, "application/pdf");

        let bad = dir.path().join("notes.docx");
        fs::write(&bad, b"x").unwrap();
        assert!(Attachment::from_path(&bad).is_err());
    }
}
