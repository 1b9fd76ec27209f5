//! Text extraction: turns an uploaded PDF into plain text, page by page.
//!
//! Parsing is CPU-bound and runs inside `tokio::task::spawn_blocking`.

use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::analysis::upload::TransientDocument;

/// Inserted between consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n";

const SUPPORTED_MEDIA_TYPES: &[&str] = &["application/pdf", "application/octet-stream"];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Document is empty")]
    Empty,

    #[error("Failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Document has no pages")]
    NoPages,
}

/// Plain text of a document, pages concatenated in stored order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    text: String,
    page_count: usize,
}

impl ExtractedText {
    pub fn from_pages(pages: Vec<String>) -> Self {
        let page_count = pages.len();
        Self {
            text: pages.join(PAGE_SEPARATOR),
            page_count,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    /// Extracts the text of a stored PDF. The document is only read, never modified.
    pub async fn extract(&self, document: &TransientDocument) -> Result<ExtractedText, ExtractionError> {
        if let Some(media_type) = document.media_type() {
            let essence = media_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            if !SUPPORTED_MEDIA_TYPES.contains(&essence.as_str()) {
                return Err(ExtractionError::UnsupportedMediaType(media_type.to_string()));
            }
        }

        let path: PathBuf = document.path().to_path_buf();
        let pages = tokio::task::spawn_blocking(move || -> Result<Vec<String>, ExtractionError> {
            let bytes = std::fs::read(&path)?;
            extract_pages(&bytes)
        })
        .await
        .map_err(|e| ExtractionError::Parse(format!("extraction task failed: {e}")))??;

        let extracted = ExtractedText::from_pages(pages);
        debug!(
            "Extracted {} chars from {} page(s)",
            extracted.as_str().len(),
            extracted.page_count()
        );
        Ok(extracted)
    }
}

/// Splits a PDF into per-page text, in page order.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    if bytes.is_empty() {
        return Err(ExtractionError::Empty);
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Parse(e.to_string()))?;

    if pages.is_empty() {
        return Err(ExtractionError::NoPages);
    }
    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{pdf_document, pdf_with_pages};
    use crate::analysis::upload::Document;
    use bytes::Bytes;

    #[test]
    fn test_from_pages_joins_with_separator() {
        let text = ExtractedText::from_pages(vec!["one".into(), "two".into(), "three".into()]);
        assert_eq!(text.as_str(), "one\ntwo\nthree");
        assert_eq!(text.page_count(), 3);
    }

    #[test]
    fn test_empty_bytes_rejected() {
        assert!(matches!(extract_pages(&[]), Err(ExtractionError::Empty)));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let result = extract_pages(b"this is not a pdf at all");
        assert!(matches!(result, Err(ExtractionError::Parse(_))));
    }

    #[test]
    fn test_zero_page_document_rejected() {
        let result = extract_pages(&pdf_with_pages(&[]));
        assert!(matches!(result, Err(ExtractionError::NoPages)));
    }

    #[test]
    fn test_single_page_text_extracted() {
        let pages = extract_pages(&pdf_with_pages(&["Experienced backend engineer"])).unwrap();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains("Experienced backend engineer"));
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let pdf = pdf_with_pages(&["Alpha page", "Beta page"]);
        let first = ExtractedText::from_pages(extract_pages(&pdf).unwrap());
        let second = ExtractedText::from_pages(extract_pages(&pdf).unwrap());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_pages_kept_in_stored_order() {
        let dir = tempfile::tempdir().unwrap();
        let stored = TransientDocument::persist(
            dir.path(),
            &pdf_document(&["First page text", "Second page text"]),
        )
        .unwrap();

        let extracted = TextExtractor.extract(&stored).await.unwrap();
        assert_eq!(extracted.page_count(), 2);

        let text = extracted.as_str();
        let first = text.find("First").unwrap();
        let second = text.find("Second").unwrap();
        assert!(first < second);
        assert!(text[first..second].contains(PAGE_SEPARATOR));
    }

    #[tokio::test]
    async fn test_zero_page_upload_rejected_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let stored = TransientDocument::persist(dir.path(), &pdf_document(&[])).unwrap();

        let result = TextExtractor.extract(&stored).await;
        assert!(matches!(result, Err(ExtractionError::NoPages)));

        drop(stored);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_media_type_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let stored = TransientDocument::persist(
            dir.path(),
            &Document {
                file_name: Some("resume.docx".into()),
                media_type: Some(
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                        .into(),
                ),
                bytes: Bytes::from_static(b"PK\x03\x04"),
            },
        )
        .unwrap();

        let result = TextExtractor.extract(&stored).await;
        assert!(matches!(result, Err(ExtractionError::UnsupportedMediaType(_))));
    }

    #[tokio::test]
    async fn test_media_type_parameters_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut document = pdf_document(&["Hello there"]);
        document.media_type = Some("Application/PDF; charset=binary".into());
        let stored = TransientDocument::persist(dir.path(), &document).unwrap();

        assert!(TextExtractor.extract(&stored).await.is_ok());
    }
}
