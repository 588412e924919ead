//! Document text extraction: PDF (pdf-extract) and plain text.
//!
//! Failures are explicit. An unreadable or empty document never reaches the
//! structurers as silent empty text.

use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Txt,
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported document format '{0}' (expected pdf or txt)")]
    UnsupportedFormat(String),

    #[error("could not read PDF: {0}")]
    Pdf(String),

    #[error("document contains no extractable text")]
    EmptyDocument,
}

impl FromStr for DocumentFormat {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_lowercase().as_str() {
            "pdf" | "application/pdf" => Ok(DocumentFormat::Pdf),
            "txt" | "text" | "text/plain" => Ok(DocumentFormat::Txt),
            other => Err(ExtractionError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl DocumentFormat {
    /// Format from a file name's extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, ExtractionError> {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        ext.parse()
    }
}

/// Extracts plain text from a document.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    let text = match format {
        // pdf-extract panics on some malformed inputs instead of returning Err.
        DocumentFormat::Pdf => std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes))
            .map_err(|_| ExtractionError::Pdf("malformed document".to_string()))?
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?,
        DocumentFormat::Txt => String::from_utf8_lossy(bytes).into_owned(),
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyDocument);
    }
    Ok(text)
}
