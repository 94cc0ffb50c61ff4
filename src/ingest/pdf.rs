use std::path::Path;

use crate::error::{DeckError, Result};
use crate::ingest::reader::{DocumentReader, ExtractedDocument};

/// Page-based PDF text extractor.
pub struct PdfReader;

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfReader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DocumentReader for PdfReader {
    fn format(&self) -> &'static str {
        "pdf"
    }

    fn extract(&self, path: &Path, bytes: &[u8]) -> Result<ExtractedDocument> {
        let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|e| DeckError::Extraction {
            path: path.to_string_lossy().into(),
            detail: format!("PDF extraction error: {e}"),
        })?;
        // The extractor separates pages with form feeds.
        let doc = ExtractedDocument::paged(&raw, bytes);
        tracing::debug!(path = %path.display(), pages = doc.page_count, "extracted pdf");
        Ok(doc)
    }
}
