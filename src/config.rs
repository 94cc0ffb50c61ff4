use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::pipeline::{budget, sizer, PipelineSettings};

/// Directory holding per-project settings.
const DECK_DIR: &str = ".deckchunk";
/// Config filename.
const CONFIG_FILE: &str = "config.toml";

/// Project-level configuration resolved from the working directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory documents are resolved against.
    pub project_root: PathBuf,
    /// Path to the `.deckchunk/` directory.
    pub deck_dir: PathBuf,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// User settings loaded from config.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from .deckchunk/config.toml.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub chunking: ChunkingSettings,
    pub budget: BudgetSettings,
    pub scan: ScanSettings,
    pub output: OutputSettings,
}

/// Chunk size band and merge ceiling, in characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub min_chunk_size: usize,
    pub max_chunk_size: usize,
    pub merge_ceiling: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            min_chunk_size: sizer::MIN_CHUNK_SIZE,
            max_chunk_size: sizer::MAX_CHUNK_SIZE,
            merge_ceiling: sizer::MAX_CHUNK_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    /// Truncate output to the slide budget.
    pub enabled: bool,
    /// Cap used when the page count is unknown.
    pub unknown_page_cap: usize,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            unknown_page_cap: budget::DEFAULT_UNKNOWN_PAGE_CAP,
        }
    }
}

/// Directory scanning settings for `batch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Path fragments to exclude from scanning.
    pub exclude_patterns: Vec<String>,
    /// Maximum document size in MB (larger files are skipped).
    pub max_file_size_mb: u32,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            exclude_patterns: vec![
                ".git/".into(),
                "node_modules/".into(),
                "target/".into(),
                ".deckchunk/".into(),
            ],
            max_file_size_mb: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output format: "minified" (default) or "pretty".
    pub format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: "minified".into(),
        }
    }
}

impl OutputSettings {
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

impl Config {
    /// Create config for a given project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let deck_dir = project_root.join(DECK_DIR);
        let config_path = deck_dir.join(CONFIG_FILE);

        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            project_root,
            deck_dir,
            config_path,
            settings,
        }
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| DeckError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "invalid config, using defaults"
                );
                None
            }
        }
    }

    /// Save current settings to config.toml.
    pub fn save_settings(&self) -> Result<()> {
        std::fs::create_dir_all(&self.deck_dir)?;
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| DeckError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Pipeline tunables derived from the user settings.
    #[must_use]
    pub fn pipeline_settings(&self) -> PipelineSettings {
        let chunking = &self.settings.chunking;
        PipelineSettings {
            min_chunk_size: chunking.min_chunk_size,
            max_chunk_size: chunking.max_chunk_size,
            merge_ceiling: chunking.merge_ceiling,
            apply_budget: self.settings.budget.enabled,
            unknown_page_cap: self.settings.budget.unknown_page_cap,
        }
    }

    /// Resolve a user-supplied path against the project root.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.project_root.join(p)
        }
    }

    /// Convert an absolute path to a project-relative path string.
    #[must_use]
    pub fn relative_path(&self, abs: &Path) -> String {
        abs.strip_prefix(&self.project_root)
            .unwrap_or(abs)
            .to_string_lossy()
            .replace('\\', "/")
    }

    /// Whether a scanned path matches one of the `[scan]` exclude fragments.
    #[must_use]
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.settings
            .scan
            .exclude_patterns
            .iter()
            .map(|p| p.trim_end_matches('/'))
            .any(|p| !p.is_empty() && path_str.contains(p))
    }

    /// Whether a document exceeds `max_file_size_mb`. A limit of 0 disables the check.
    #[must_use]
    pub fn is_file_too_large(&self, size_bytes: u64) -> bool {
        let max_mb = self.settings.scan.max_file_size_mb;
        max_mb > 0 && size_bytes > u64::from(max_mb) * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_new_sets_paths() {
        let cfg = Config::new("/tmp/project");
        assert_eq!(cfg.deck_dir, PathBuf::from("/tmp/project/.deckchunk"));
        assert_eq!(
            cfg.config_path,
            PathBuf::from("/tmp/project/.deckchunk/config.toml")
        );
    }

    #[test]
    fn default_settings_match_pipeline_defaults() {
        let cfg = Config::new("/tmp/project");
        assert_eq!(cfg.pipeline_settings(), PipelineSettings::default());
        assert_eq!(cfg.settings.scan.max_file_size_mb, 50);
        assert!(!cfg.settings.output.is_pretty());
    }

    #[test]
    fn save_and_load_settings() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = Config::new(tmp.path());
        cfg.settings.chunking.min_chunk_size = 150;
        cfg.settings.budget.enabled = false;
        cfg.settings.output.format = "pretty".into();
        cfg.save_settings().unwrap();
        assert!(cfg.config_path.exists());

        let reloaded = Config::new(tmp.path());
        assert_eq!(reloaded.settings, cfg.settings);
        let pipeline = reloaded.pipeline_settings();
        assert_eq!(pipeline.min_chunk_size, 150);
        assert!(!pipeline.apply_budget);
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".deckchunk");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "[budget]\nunknown_page_cap = 12\n").unwrap();

        let cfg = Config::new(tmp.path());
        assert_eq!(cfg.settings.budget.unknown_page_cap, 12);
        assert!(cfg.settings.budget.enabled);
        assert_eq!(cfg.settings.chunking, ChunkingSettings::default());
    }

    #[test]
    fn load_invalid_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".deckchunk");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.toml"), "invalid toml {{{{").unwrap();

        let cfg = Config::new(tmp.path());
        assert_eq!(cfg.settings, UserSettings::default());
    }

    #[test]
    fn should_exclude_patterns() {
        let cfg = Config::new("/tmp/project");
        assert!(cfg.should_exclude(Path::new("/tmp/project/.git/HEAD")));
        assert!(cfg.should_exclude(Path::new("/tmp/project/.deckchunk/config.toml")));
        assert!(!cfg.should_exclude(Path::new("/tmp/project/papers/essay.txt")));
        assert!(cfg.should_exclude(Path::new("node_modules/pkg/README.md")));
    }

    #[test]
    fn file_size_limit() {
        let cfg = Config::new("/tmp/project");
        let max_bytes = 50 * 1024 * 1024;
        assert!(!cfg.is_file_too_large(max_bytes));
        assert!(cfg.is_file_too_large(max_bytes + 1));

        let mut unlimited = cfg.clone();
        unlimited.settings.scan.max_file_size_mb = 0;
        assert!(!unlimited.is_file_too_large(u64::MAX));
    }

    #[test]
    fn resolve_and_relative_paths() {
        let cfg = Config::new("/tmp/project");
        assert_eq!(cfg.resolve("doc.txt"), PathBuf::from("/tmp/project/doc.txt"));
        assert_eq!(cfg.resolve("/abs/doc.txt"), PathBuf::from("/abs/doc.txt"));
        assert_eq!(cfg.relative_path(Path::new("/tmp/project/a/b.pdf")), "a/b.pdf");
    }
}
