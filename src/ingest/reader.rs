use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

const PAGE_BREAK: char = '\x0C';

/// Text pulled out of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedDocument {
    pub text: String,
    /// Number of pages, `0` when the format has no page notion.
    pub page_count: u32,
    /// Hex SHA-256 of the source bytes the text was extracted from.
    pub sha256: String,
}

impl ExtractedDocument {
    /// Document without page structure.
    #[must_use]
    pub fn unpaged(text: &str, source: &[u8]) -> Self {
        Self {
            text: text.to_string(),
            page_count: 0,
            sha256: fingerprint(source),
        }
    }

    /// Document whose pages are separated by form feeds. Blank pages count
    /// toward `page_count` but contribute no text. A form feed at the very
    /// end terminates the last page rather than opening a new one.
    #[must_use]
    pub fn paged(raw: &str, source: &[u8]) -> Self {
        let body = raw.trim_end_matches(|c: char| c.is_whitespace() && c != PAGE_BREAK);
        let body = body.strip_suffix(PAGE_BREAK).unwrap_or(body);
        Self {
            text: join_pages(&split_pages(body)),
            page_count: body.split(PAGE_BREAK).count() as u32,
            sha256: fingerprint(source),
        }
    }
}

/// Format-specific text extractor.
pub trait DocumentReader: Send + Sync {
    /// Format identifier.
    fn format(&self) -> &'static str;

    /// Extract text and page count from a file's raw bytes. `path` is only
    /// used for error context.
    fn extract(&self, path: &Path, bytes: &[u8]) -> Result<ExtractedDocument>;
}

/// Hex SHA-256 identifying a source document.
#[must_use]
pub fn fingerprint(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Split extracted text on form feeds into non-empty, trimmed pages.
#[must_use]
pub fn split_pages(text: &str) -> Vec<&str> {
    text.split(PAGE_BREAK)
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect()
}

/// Join pages with a blank line so page breaks become paragraph breaks.
#[must_use]
pub fn join_pages(pages: &[&str]) -> String {
    pages.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_pages_skips_empty() {
        let pages = split_pages("Page one\x0C  \x0CPage three\n");
        assert_eq!(pages, vec!["Page one", "Page three"]);
    }

    #[test]
    fn split_pages_without_form_feed() {
        assert_eq!(split_pages("just text"), vec!["just text"]);
        assert!(split_pages("  \n ").is_empty());
    }

    #[test]
    fn join_inserts_blank_line() {
        assert_eq!(join_pages(&["a", "b"]), "a\n\nb");
    }

    #[test]
    fn blank_pages_count_but_add_no_text() {
        let doc = ExtractedDocument::paged("Content\x0C\x0C  \x0CMore content", b"src");
        assert_eq!(doc.page_count, 4);
        assert_eq!(doc.text, "Content\n\nMore content");
    }

    #[test]
    fn trailing_form_feed_ends_the_last_page() {
        let doc = ExtractedDocument::paged("Page one\x0CPage two\x0C\n", b"src");
        assert_eq!(doc.page_count, 2);
        assert_eq!(doc.text, "Page one\n\nPage two");

        let doc = ExtractedDocument::paged("Page one\x0C\x0C", b"src");
        assert_eq!(doc.page_count, 2);
    }

    #[test]
    fn fingerprint_tracks_source_bytes() {
        let a = ExtractedDocument::unpaged("Same text.", b"first upload");
        let b = ExtractedDocument::unpaged("Same text.", b"second upload");
        assert_eq!(a.sha256.len(), 64);
        assert_ne!(a.sha256, b.sha256);
        assert_eq!(a.sha256, fingerprint(b"first upload"));
        assert_eq!(
            fingerprint(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
