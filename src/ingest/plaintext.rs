use std::path::Path;

use crate::error::{DeckError, Result};
use crate::ingest::reader::{DocumentReader, ExtractedDocument};

/// UTF-8 text and Markdown documents.
pub struct PlaintextReader;

impl Default for PlaintextReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaintextReader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build a document from already-loaded text. Form feeds mark pages.
    #[must_use]
    pub fn from_text(text: &str) -> ExtractedDocument {
        if text.contains('\x0C') {
            ExtractedDocument::paged(text, text.as_bytes())
        } else {
            ExtractedDocument::unpaged(text, text.as_bytes())
        }
    }
}

impl DocumentReader for PlaintextReader {
    fn format(&self) -> &'static str {
        "plaintext"
    }

    fn extract(&self, path: &Path, bytes: &[u8]) -> Result<ExtractedDocument> {
        let text = std::str::from_utf8(bytes).map_err(|e| DeckError::Extraction {
            path: path.to_string_lossy().into(),
            detail: format!("not valid UTF-8: {e}"),
        })?;
        Ok(Self::from_text(text))
    }
}
