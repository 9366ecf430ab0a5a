// src/profile/document.rs
//! Uploaded CV documents and their conversion to plain text.

use async_trait::async_trait;
use thiserror::Error;

pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("File too large ({size} bytes). Maximum size is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("Unsupported file type: {0}. Upload a PDF, DOCX, DOC or TXT file")]
    UnsupportedType(String),

    #[error("Could not extract any text from the document")]
    EmptyText,

    #[error("TEXT_EXTRACTION_URL not configured")]
    NotConfigured,

    #[error("text extraction request failed: {0}")]
    Request(String),

    #[error("text extraction service returned error {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
    Text,
}

impl DocumentKind {
    /// Resolve the kind from the MIME type, falling back to the file extension.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Option<Self> {
        let by_mime = content_type.and_then(|mime| {
            match mime.split(';').next().unwrap_or_default().trim() {
                "application/pdf" => Some(Self::Pdf),
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                    Some(Self::Docx)
                }
                "application/msword" => Some(Self::Doc),
                "text/plain" => Some(Self::Text),
                _ => None,
            }
        });

        by_mime.or_else(|| {
            let extension = file_name.rsplit_once('.')?.1.to_lowercase();
            match extension.as_str() {
                "pdf" => Some(Self::Pdf),
                "docx" => Some(Self::Docx),
                "doc" => Some(Self::Doc),
                "txt" => Some(Self::Text),
                _ => None,
            }
        })
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Doc => "application/msword",
            Self::Text => "text/plain",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Converts binary documents (PDF, Word) to text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(
        &self,
        kind: DocumentKind,
        document: &UploadedDocument,
    ) -> Result<String, ExtractionError>;
}

/// Validate the upload and turn it into text. Plain text is decoded locally.
pub async fn extract_document_text(
    document: &UploadedDocument,
    extractor: Option<&dyn TextExtractor>,
) -> Result<String, ExtractionError> {
    if document.bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(ExtractionError::TooLarge {
            size: document.bytes.len(),
            limit: MAX_DOCUMENT_BYTES,
        });
    }

    let kind = DocumentKind::detect(&document.file_name, document.content_type.as_deref())
        .ok_or_else(|| {
            ExtractionError::UnsupportedType(
                document
                    .content_type
                    .clone()
                    .unwrap_or_else(|| document.file_name.clone()),
            )
        })?;

    let text = match kind {
        DocumentKind::Text => String::from_utf8_lossy(&document.bytes).into_owned(),
        _ => {
            let extractor = extractor.ok_or(ExtractionError::NotConfigured)?;
            extractor.extract(kind, document).await?
        }
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyText);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, mime: Option<&str>, bytes: &[u8]) -> UploadedDocument {
        UploadedDocument {
            file_name: name.to_string(),
            content_type: mime.map(str::to_string),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(DocumentKind::detect("cv.pdf", None), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::detect("upload", Some("application/msword")),
            Some(DocumentKind::Doc)
        );
        assert_eq!(
            DocumentKind::detect("cv.TXT", Some("application/octet-stream")),
            Some(DocumentKind::Text)
        );
        assert_eq!(DocumentKind::detect("cv.png", Some("image/png")), None);
    }

    #[tokio::test]
    async fn test_plain_text_decoded_locally() {
        let text = extract_document_text(&doc("cv.txt", Some("text/plain"), b"Jane Doe\nRust"), None)
            .await
            .unwrap();
        assert_eq!(text, "Jane Doe\nRust");
    }

    #[tokio::test]
    async fn test_rejects_large_and_unsupported() {
        let big = vec![b'a'; MAX_DOCUMENT_BYTES + 1];
        assert!(matches!(
            extract_document_text(&doc("cv.txt", None, &big), None).await,
            Err(ExtractionError::TooLarge { .. })
        ));
        assert!(matches!(
            extract_document_text(&doc("cv.png", Some("image/png"), b"x"), None).await,
            Err(ExtractionError::UnsupportedType(_))
        ));
    }

    #[tokio::test]
    async fn test_pdf_without_extractor_is_not_configured() {
        let result = extract_document_text(&doc("cv.pdf", None, b"%PDF"), None).await;
        assert!(matches!(result, Err(ExtractionError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let result = extract_document_text(&doc("cv.txt", None, b"  \n "), None).await;
        assert!(matches!(result, Err(ExtractionError::EmptyText)));
    }
}
