//! Document extraction: readers per format, fingerprints and directory scanning.

pub mod dispatcher;
pub mod pdf;
pub mod plaintext;
pub mod reader;
pub mod scanner;

use std::path::Path;

use once_cell::sync::Lazy;

use crate::error::Result;

pub use dispatcher::Dispatcher;
pub use reader::{DocumentReader, ExtractedDocument};
pub use scanner::{ScannedFile, Scanner};

static DISPATCHER: Lazy<Dispatcher> = Lazy::new(Dispatcher::new);

/// Reader registered for the path's extension.
pub fn reader_for(path: &Path) -> Result<&'static dyn DocumentReader> {
    DISPATCHER.reader_for(path)
}

/// Read any supported document.
pub fn read_document(path: &Path) -> Result<ExtractedDocument> {
    DISPATCHER.read(path)
}

/// Whether an extension has a registered reader.
#[must_use]
pub fn is_supported_extension(ext: &str) -> bool {
    DISPATCHER.supports(ext)
}
