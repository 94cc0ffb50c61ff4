use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

use crate::config::Config;
use crate::error::{DeckError, Result};
use crate::ingest::is_supported_extension;

/// Document found under a batch root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub path: PathBuf,
    /// Path relative to the scan root, `/`-separated.
    pub relative_path: String,
    pub size: u64,
}

/// Finds the documents a batch run should process. Honors `.gitignore`
/// files (with or without a repository), skips hidden entries and applies
/// the project's `[scan]` exclusions and size limit.
pub struct Scanner<'a> {
    root: PathBuf,
    config: &'a Config,
}

impl<'a> Scanner<'a> {
    pub fn new(root: impl Into<PathBuf>, config: &'a Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Supported documents under the root, sorted by relative path.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(DeckError::FileNotFound {
                path: self.root.to_string_lossy().into(),
            });
        }

        let mut files: Vec<ScannedFile> = WalkBuilder::new(&self.root)
            .require_git(false)
            .build()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .filter_map(|entry| self.accept(entry.path()))
            .collect();
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    fn accept(&self, path: &Path) -> Option<ScannedFile> {
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(is_supported_extension);
        if !supported {
            return None;
        }

        let relative_path = path
            .strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/");
        if self.config.should_exclude(Path::new(&relative_path)) {
            return None;
        }

        let size = path.metadata().ok()?.len();
        if self.config.is_file_too_large(size) {
            debug!(path = %relative_path, size, "document over size limit");
            return None;
        }

        Some(ScannedFile {
            path: path.to_path_buf(),
            relative_path,
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn relative_paths(files: &[ScannedFile]) -> Vec<&str> {
        files.iter().map(|f| f.relative_path.as_str()).collect()
    }

    #[test]
    fn finds_mixed_documents_recursively() {
        let tmp = TempDir::new().unwrap();
        let chapters = tmp.path().join("chapters");
        fs::create_dir_all(&chapters).unwrap();
        fs::write(chapters.join("one.txt"), "Chapter one.").unwrap();
        fs::write(tmp.path().join("paper.pdf"), "%PDF-1.4").unwrap();
        fs::write(tmp.path().join("notes.MD"), "# Notes").unwrap();
        fs::write(tmp.path().join("essay.txt"), "An essay.").unwrap();
        fs::write(tmp.path().join("chart.png"), "image").unwrap();
        fs::write(tmp.path().join("deck.pptx"), "slides").unwrap();

        let config = Config::new(tmp.path());
        let files = Scanner::new(tmp.path(), &config).scan().unwrap();
        assert_eq!(
            relative_paths(&files),
            vec!["chapters/one.txt", "essay.txt", "notes.MD", "paper.pdf"]
        );
        assert_eq!(files[1].size, "An essay.".len() as u64);
    }

    #[test]
    fn configured_exclusions_skip_folders() {
        let tmp = TempDir::new().unwrap();
        let drafts = tmp.path().join("drafts");
        fs::create_dir_all(&drafts).unwrap();
        fs::write(drafts.join("outline.md"), "draft").unwrap();
        fs::write(tmp.path().join("final.md"), "final").unwrap();

        let mut config = Config::new(tmp.path());
        config.settings.scan.exclude_patterns = vec!["drafts/".into()];
        let files = Scanner::new(tmp.path(), &config).scan().unwrap();
        assert_eq!(relative_paths(&files), vec!["final.md"]);
    }

    #[test]
    fn project_settings_dir_is_never_scanned() {
        let tmp = TempDir::new().unwrap();
        let deck = tmp.path().join(".deckchunk");
        fs::create_dir_all(&deck).unwrap();
        fs::write(deck.join("notes.txt"), "settings notes").unwrap();
        fs::write(tmp.path().join("report.txt"), "report").unwrap();

        let config = Config::new(tmp.path());
        let files = Scanner::new(tmp.path(), &config).scan().unwrap();
        assert_eq!(relative_paths(&files), vec!["report.txt"]);
    }

    #[test]
    fn gitignore_applies_outside_a_repository() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".gitignore"), "private.pdf\n").unwrap();
        fs::write(tmp.path().join("private.pdf"), "%PDF-1.4").unwrap();
        fs::write(tmp.path().join("public.pdf"), "%PDF-1.4").unwrap();

        let config = Config::new(tmp.path());
        let files = Scanner::new(tmp.path(), &config).scan().unwrap();
        assert_eq!(relative_paths(&files), vec!["public.pdf"]);
    }

    #[test]
    fn oversized_documents_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("scan.txt"), "x".repeat(1024 * 1024 + 1)).unwrap();
        fs::write(tmp.path().join("memo.txt"), "short memo").unwrap();

        let mut config = Config::new(tmp.path());
        config.settings.scan.max_file_size_mb = 1;
        let files = Scanner::new(tmp.path(), &config).scan().unwrap();
        assert_eq!(relative_paths(&files), vec!["memo.txt"]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let config = Config::new(tmp.path());
        let err = Scanner::new(tmp.path().join("absent"), &config)
            .scan()
            .unwrap_err();
        assert!(matches!(err, DeckError::FileNotFound { .. }));
    }
}
