//! src/config.rs
//! ============================================================================
//! # Config: widget options and logging settings (TOML)
//!
//! Settings live in `config.toml` under the platform config directory found
//! through [`directories`](https://docs.rs/directories). The host loads them
//! asynchronously at startup, hands [`FileListConfig`] to the widget, and
//! writes them back on exit when the widget reports changed options.
//!
//! Every field has a default, so partial files are accepted.
//!
//! ## Example
//! ```rust,ignore
//! let config = Config::load().await?;
//! config.save().await?;
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use compact_str::CompactString;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::{info, warn};

use crate::error::AppError;
use crate::model::catalog::DEFAULT_MAX_ENTRIES;
use crate::model::file_types::{FileTypeId, FileTypeRegistry};
use crate::model::search::DEFAULT_SEARCH_TIMEOUT;
use crate::model::sort::SortSpec;
use crate::view::layout::MAX_INTERLINE;

const CONFIG_FILE: &str = "config.toml";
const APP_NAME: &str = "filelist";

/// One registered extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTypeConfig {
    pub extension: CompactString,
    pub id: FileTypeId,
}

impl FileTypeConfig {
    fn new(extension: &str, id: u32) -> Self {
        Self {
            extension: CompactString::from(extension),
            id: FileTypeId(id),
        }
    }
}

/// Options of one file list widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileListConfig {
    /// Sort keys in text form, e.g. `"-31"`.
    pub sort_key: SortSpec,

    pub show_size: bool,

    pub show_date: bool,

    pub show_time: bool,

    /// Underscores to spaces in file names.
    pub strip_names: bool,

    /// Extra eighths of a cell between rows, 0..=6.
    pub interline: u8,

    pub show_status: bool,

    pub scroll_names: bool,

    pub file_color: String,

    pub selected_color: String,

    pub dir_color: String,

    pub archive_color: String,

    pub initial_dir: PathBuf,

    /// List tar archives and allow entering them.
    pub archive_support: bool,

    /// Ask before decompressing.
    pub confirm_decompress: bool,

    pub max_entries: usize,

    #[serde(with = "humantime_serde")]
    pub search_timeout: Duration,

    pub file_types: Vec<FileTypeConfig>,
}

impl Default for FileListConfig {
    fn default() -> Self {
        Self {
            sort_key: SortSpec::default(),
            show_size: true,
            show_date: true,
            show_time: false,
            strip_names: true,
            interline: 0,
            show_status: true,
            scroll_names: true,
            file_color: "255 255 255 255".to_string(),
            selected_color: "255 255 255 255".to_string(),
            dir_color: "170 170 255 255".to_string(),
            archive_color: "255 200 120 255".to_string(),
            initial_dir: PathBuf::from("."),
            archive_support: true,
            confirm_decompress: false,
            max_entries: DEFAULT_MAX_ENTRIES,
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
            file_types: vec![
                FileTypeConfig::new(".mvd", 1),
                FileTypeConfig::new(".qwd", 2),
                FileTypeConfig::new(".dem", 3),
                FileTypeConfig::new(".gz", 4),
            ],
        }
    }
}

impl FileListConfig {
    #[must_use]
    pub fn interline(&self) -> u8 {
        self.interline.min(MAX_INTERLINE)
    }

    /// Registry of the configured types. Rejected entries are logged and
    /// skipped.
    #[must_use]
    pub fn type_registry(&self) -> FileTypeRegistry {
        let mut registry = FileTypeRegistry::new();
        for ty in &self.file_types {
            if let Err(e) = registry.register(ty.id, &ty.extension) {
                warn!("Skipping file type {:?}: {e}", ty.extension);
            }
        }
        registry
    }
}

/// Log file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,

    pub log_file_prefix: CompactString,

    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: CompactString,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            log_file_prefix: CompactString::const_new(APP_NAME),
            level: CompactString::const_new("info"),
        }
    }
}

/// Main configuration struct for the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub file_list: FileListConfig,

    pub logging: LoggingConfig,
}

impl Config {
    /// Loads config from the platform config dir, creating it with defaults
    /// when absent.
    pub async fn load() -> Result<Self, AppError> {
        Self::load_from(&Self::config_path()?).await
    }

    pub async fn load_from(path: &Path) -> Result<Self, AppError> {
        if TokioFs::try_exists(path).await.unwrap_or(false) {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path)
                .await
                .map_err(|source| AppError::ConfigIo {
                    path: path.to_path_buf(),
                    source,
                })?;
            Self::from_toml_str(&text)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );
            let config = Self::default();
            config.save_to(path).await?;
            Ok(config)
        }
    }

    /// Saves config to the platform config dir.
    pub async fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::config_path()?).await
    }

    pub async fn save_to(&self, path: &Path) -> Result<(), AppError> {
        info!("Saving config to {}", path.display());

        let io_err = |source| AppError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await.map_err(io_err)?;
        }
        TokioFs::write(path, self.to_toml_string()?)
            .await
            .map_err(io_err)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        Ok(toml::from_str(text)?)
    }

    pub fn to_toml_string(&self) -> Result<String, AppError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Canonical config file path.
    pub fn config_path() -> Result<PathBuf, AppError> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    pub fn config_dir() -> Result<PathBuf, AppError> {
        let dirs = ProjectDirs::from("", "", APP_NAME)
            .ok_or_else(|| AppError::Other("Could not determine config directory.".into()))?;
        Ok(dirs.config_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::model::sort::{SortField, SortKey};

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
            [file_list]
            sort_key = "-31"
            show_time = true
            interline = 9
            search_timeout = "500ms"

            [[file_list.file_types]]
            extension = "qwz"
            id = 7
            "#,
        )
        .unwrap();

        let list = &config.file_list;
        assert_eq!(
            list.sort_key.keys(),
            &[
                SortKey::descending(SortField::Modified),
                SortKey::ascending(SortField::Name)
            ]
        );
        assert!(list.show_time);
        assert!(list.show_size);
        assert_eq!(list.interline(), MAX_INTERLINE);
        assert_eq!(list.search_timeout, Duration::from_millis(500));
        assert_eq!(list.type_registry().find("a.QWZ"), Some(0));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_bad_sort_key_is_a_config_error() {
        let err = Config::from_toml_str("[file_list]\nsort_key = \"9\"\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_invalid_types_are_skipped() {
        let mut list = FileListConfig::default();
        list.file_types = vec![
            FileTypeConfig::new("", 1),
            FileTypeConfig::new(".mvd", 2),
        ];
        let registry = list.type_registry();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("x.mvd"), Some(0));
    }

    #[tokio::test]
    async fn test_load_creates_then_roundtrips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let created = Config::load_from(&path).await.unwrap();
        assert_eq!(created, Config::default());
        assert!(path.exists());

        let mut changed = created.clone();
        changed.file_list.sort_key.toggle(SortField::Size);
        changed.file_list.show_date = false;
        changed.save_to(&path).await.unwrap();

        let loaded = Config::load_from(&path).await.unwrap();
        assert_eq!(loaded, changed);
        assert_eq!(loaded.file_list.sort_key.to_string(), "21");
    }

    #[tokio::test]
    async fn test_unreadable_file_reports_path() {
        let dir = TempDir::new().unwrap();
        // a directory where the file should be
        let path = dir.path().join(CONFIG_FILE);
        std::fs::create_dir(&path).unwrap();

        let err = Config::load_from(&path).await.unwrap_err();
        assert!(matches!(err, AppError::ConfigIo { .. }));
    }
}
