//! Document intake
//!
//! Validates an uploaded financial statement before anything is sent to the
//! model: MIME type (sniffed from magic bytes, extension fallback) and size.
//! Produces an immutable `AcceptedDocument` carrying the bytes and their
//! SHA-256 checksum for traceability.

use crate::error::ValidationError;
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;

/// Upload size limit: 10 MiB
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_JPEG: &str = "image/jpeg";
pub const MIME_PNG: &str = "image/png";
pub const MIME_WEBP: &str = "image/webp";

/// MIME types the analyzer accepts
pub const ACCEPTED_MIME_TYPES: [&str; 4] = [MIME_PDF, MIME_JPEG, MIME_PNG, MIME_WEBP];

/// A validated upload, ready for the analysis client
#[derive(Debug, Clone)]
pub struct AcceptedDocument {
    /// Original filename as supplied by the upload surface
    pub file_name: String,
    /// One of `ACCEPTED_MIME_TYPES`
    pub mime_type: &'static str,
    /// Raw document bytes, unmodified
    pub bytes: Vec<u8>,
    /// Hex SHA-256 of `bytes`, for logging only
    pub checksum: String,
}

/// Failure loading a document from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Validate a single upload.
///
/// The size cap applies regardless of type, so it is checked first; a 40 MB
/// text file reports `TooLarge`, not `UnsupportedType`.
pub fn validate(file_name: &str, bytes: Vec<u8>) -> Result<AcceptedDocument, ValidationError> {
    let size = bytes.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        tracing::warn!("[Intake] Rejected {}: {} bytes over limit", file_name, size);
        return Err(ValidationError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let mime_type = match detect_mime(file_name, &bytes) {
        Some(m) => m,
        None => {
            let reported = mime_guess::from_path(file_name)
                .first_raw()
                .unwrap_or("unknown");
            tracing::warn!("[Intake] Rejected {}: unsupported type {}", file_name, reported);
            return Err(ValidationError::UnsupportedType(reported.to_string()));
        }
    };

    let checksum = hex::encode(Sha256::digest(&bytes));
    tracing::info!(
        "[Intake] Accepted {} ({} bytes, {}, sha256 {})",
        file_name,
        size,
        mime_type,
        &checksum[..12]
    );

    Ok(AcceptedDocument {
        file_name: file_name.to_string(),
        mime_type,
        bytes,
        checksum,
    })
}

/// Validate a multi-file drop. Only the first entry is considered; the rest
/// are ignored. Returns `None` for an empty drop.
pub fn validate_first(
    drops: Vec<(String, Vec<u8>)>,
) -> Option<Result<AcceptedDocument, ValidationError>> {
    let (name, bytes) = drops.into_iter().next()?;
    Some(validate(&name, bytes))
}

/// Read a document from disk and validate it.
pub async fn load(path: &Path) -> Result<AcceptedDocument, LoadError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(validate(&file_name, bytes)?)
}

/// Resolve the document's MIME type: magic bytes first, then the extension.
/// Returns `None` when the result is outside the accepted set.
fn detect_mime(file_name: &str, bytes: &[u8]) -> Option<&'static str> {
    if let Some(sniffed) = sniff_mime(bytes) {
        return Some(sniffed);
    }

    let guessed = mime_guess::from_path(file_name).first_raw()?;
    ACCEPTED_MIME_TYPES.iter().find(|m| **m == guessed).copied()
}

/// Detect MIME type from magic bytes
fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(b"%PDF-") {
        Some(MIME_PDF)
    } else if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        Some(MIME_PNG)
    } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(MIME_JPEG)
    } else if data.starts_with(b"RIFF") && data.get(8..12) == Some(b"WEBP".as_slice()) {
        Some(MIME_WEBP)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pdf_bytes(len: usize) -> Vec<u8> {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.resize(len, b' ');
        bytes
    }

    #[test]
    fn test_accepts_pdf() {
        let doc = validate("statement.pdf", pdf_bytes(2048)).unwrap();
        assert_eq!(doc.mime_type, MIME_PDF);
        assert_eq!(doc.file_name, "statement.pdf");
        assert_eq!(doc.checksum.len(), 64);
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = validate("notes.txt", b"quarterly notes".to_vec()).unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedType(_)));
    }

    #[test]
    fn test_too_large_wins_over_type() {
        // Oversized AND unsupported: size is checked first
        let bytes = vec![b'x'; (MAX_UPLOAD_BYTES + 1) as usize];
        let err = validate("dump.bin", bytes).unwrap_err();
        assert!(matches!(err, ValidationError::TooLarge { .. }));
    }

    #[test]
    fn test_exactly_at_limit_is_accepted() {
        let bytes = pdf_bytes(MAX_UPLOAD_BYTES as usize);
        assert!(validate("big.pdf", bytes).is_ok());
    }

    #[test]
    fn test_magic_bytes_win_over_extension() {
        // PNG content with a misleading extension
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&[0u8; 64]);
        let doc = validate("scan.pdf", bytes).unwrap();
        assert_eq!(doc.mime_type, MIME_PNG);
    }

    #[test]
    fn test_extension_fallback_without_magic() {
        // No recognizable magic bytes: the sniffer defers to the extension
        let doc = validate("photo.webp", vec![0u8; 32]).unwrap();
        assert_eq!(doc.mime_type, MIME_WEBP);
    }

    #[test]
    fn test_sniff_webp() {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(b"WEBP");
        assert_eq!(sniff_mime(&bytes), Some(MIME_WEBP));
    }

    #[test]
    fn test_checksum_is_sha256_hex() {
        let bytes = b"%PDF-abc".to_vec();
        let doc = validate("a.pdf", bytes.clone()).unwrap();
        assert_eq!(doc.checksum, hex::encode(Sha256::digest(&bytes)));
    }

    #[test]
    fn test_validate_first_uses_first_entry() {
        let drops = vec![
            ("first.pdf".to_string(), pdf_bytes(64)),
            ("second.txt".to_string(), b"ignored".to_vec()),
        ];
        let doc = validate_first(drops).unwrap().unwrap();
        assert_eq!(doc.file_name, "first.pdf");
    }

    #[test]
    fn test_validate_first_empty_drop() {
        assert!(validate_first(vec![]).is_none());
    }

    #[tokio::test]
    async fn test_load_from_disk() {
        let mut file = NamedTempFile::with_suffix(".pdf").unwrap();
        file.write_all(&pdf_bytes(128)).unwrap();

        let doc = load(file.path()).await.unwrap();
        assert_eq!(doc.mime_type, MIME_PDF);
        assert_eq!(doc.bytes.len(), 128);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load(Path::new("/nonexistent/statement.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
