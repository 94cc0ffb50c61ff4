use std::collections::HashMap;
use std::path::Path;

use crate::error::{DeckError, Result};
use crate::ingest::pdf::PdfReader;
use crate::ingest::plaintext::PlaintextReader;
use crate::ingest::reader::{DocumentReader, ExtractedDocument};

/// Extensions read as UTF-8 text.
pub const TEXT_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];

/// Routes documents to the reader registered for their extension.
pub struct Dispatcher {
    readers: HashMap<&'static str, Box<dyn DocumentReader>>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        let mut readers: HashMap<&'static str, Box<dyn DocumentReader>> = HashMap::new();
        for ext in TEXT_EXTENSIONS {
            readers.insert(*ext, Box::new(PlaintextReader::new()));
        }
        readers.insert("pdf", Box::new(PdfReader::new()));
        Self { readers }
    }

    /// Check if an extension (any case, no dot) has a reader.
    #[must_use]
    pub fn supports(&self, ext: &str) -> bool {
        self.readers.contains_key(ext.to_lowercase().as_str())
    }

    /// Reader for a path, chosen by extension.
    pub fn reader_for(&self, path: &Path) -> Result<&dyn DocumentReader> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        self.readers
            .get(ext.as_str())
            .map(|reader| &**reader)
            .ok_or(DeckError::UnsupportedFormat { ext })
    }

    /// Read a document from disk. The file is read once; its bytes feed both
    /// the extractor and the fingerprint.
    pub fn read(&self, path: &Path) -> Result<ExtractedDocument> {
        if !path.is_file() {
            return Err(DeckError::FileNotFound {
                path: path.to_string_lossy().into(),
            });
        }
        let reader = self.reader_for(path)?;
        let bytes = std::fs::read(path)?;
        reader.extract(path, &bytes)
    }
}
