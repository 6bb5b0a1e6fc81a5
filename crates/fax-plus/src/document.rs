//! Local document resolution for outgoing faxes

use std::path::Path;

use mime::Mime;
use tokio::fs;
use tracing::debug;

use crate::error::{FaxError, Result};
use crate::types::FaxDocument;

/// Map a file extension to the MIME type sent with the upload
///
/// Unknown extensions fall back to `application/octet-stream` and are left
/// to Fax.Plus to accept or reject.
pub fn mime_for_extension(extension: &str) -> Mime {
    let essence = match extension.to_ascii_lowercase().as_str() {
        "pdf" => return mime::APPLICATION_PDF,
        "jpg" | "jpeg" => return mime::IMAGE_JPEG,
        "png" => return mime::IMAGE_PNG,
        "txt" => return mime::TEXT_PLAIN,
        "tif" | "tiff" => "image/tiff",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => return mime::APPLICATION_OCTET_STREAM,
    };
    essence.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

impl FaxDocument {
    /// Resolve and read `path`, enforcing the local size limit
    pub async fn load(path: &str, max_bytes: u64) -> Result<Self> {
        let file_path = Path::new(path);

        let metadata = fs::metadata(file_path)
            .await
            .map_err(|_| FaxError::Validation(format!("File not found at {}", path)))?;

        if !metadata.is_file() {
            return Err(FaxError::Validation(format!("Not a regular file: {}", path)));
        }
        if metadata.len() == 0 {
            return Err(FaxError::Validation(format!("File is empty: {}", path)));
        }
        if metadata.len() > max_bytes {
            return Err(FaxError::Validation(format!(
                "File too large: {} bytes (limit {} bytes)",
                metadata.len(),
                max_bytes
            )));
        }

        let bytes = fs::read(file_path)
            .await
            .map_err(|e| FaxError::Validation(format!("Failed to read file '{}': {}", path, e)))?;

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let mime_type = file_path
            .extension()
            .and_then(|e| e.to_str())
            .map(mime_for_extension)
            .unwrap_or(mime::APPLICATION_OCTET_STREAM);

        debug!(file = %file_name, mime = %mime_type, len = bytes.len(), "Resolved fax document");

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, TempDir};

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(mime_for_extension("pdf"), mime::APPLICATION_PDF);
        assert_eq!(mime_for_extension("PDF"), mime::APPLICATION_PDF);
        assert_eq!(mime_for_extension("tif").as_ref(), "image/tiff");
        assert_eq!(mime_for_extension("jpeg"), mime::IMAGE_JPEG);
        assert_eq!(mime_for_extension("doc").as_ref(), "application/msword");
        assert_eq!(mime_for_extension("xyz"), mime::APPLICATION_OCTET_STREAM);
    }

    #[tokio::test]
    async fn test_load_pdf() {
        let mut file = Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-1.4\n%Test PDF content").unwrap();

        let doc = FaxDocument::load(file.path().to_str().unwrap(), 1024)
            .await
            .unwrap();

        assert_eq!(doc.mime_type, mime::APPLICATION_PDF);
        assert!(doc.file_name.ends_with(".pdf"));
        assert_eq!(doc.bytes, b"%PDF-1.4\n%Test PDF content");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = FaxDocument::load("nonexistent_file.pdf", 1024).await.unwrap_err();
        assert!(matches!(err, FaxError::Validation(msg) if msg == "File not found at nonexistent_file.pdf"));
    }

    #[tokio::test]
    async fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        let err = FaxDocument::load(dir.path().to_str().unwrap(), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, FaxError::Validation(msg) if msg.starts_with("Not a regular file")));
    }

    #[tokio::test]
    async fn test_load_empty_and_oversized() {
        let empty = Builder::new().suffix(".pdf").tempfile().unwrap();
        let err = FaxDocument::load(empty.path().to_str().unwrap(), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, FaxError::Validation(msg) if msg.starts_with("File is empty")));

        let mut big = Builder::new().suffix(".pdf").tempfile().unwrap();
        big.write_all(&[0u8; 64]).unwrap();
        let err = FaxDocument::load(big.path().to_str().unwrap(), 16)
            .await
            .unwrap_err();
        assert!(matches!(err, FaxError::Validation(msg) if msg.starts_with("File too large")));
    }
}
