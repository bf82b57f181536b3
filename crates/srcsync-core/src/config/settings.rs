//! Application configuration loaded from a TOML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Top-level configuration.
///
/// All fields have defaults so srcsync works without a config file.
/// Call [`Config::load`] to read from a TOML path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> CoreResult<Self> {
        match Self::load(path) {
            Err(CoreError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// `$HOME/.config/srcsync/config.toml`, or `/.config/...` without `$HOME`.
    pub fn default_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(".config")
            .join("srcsync")
            .join("config.toml")
    }
}

/// What a directory scan picks up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Ask before granting read access to a directory.
    #[serde(default = "default_true")]
    pub confirm_access: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            confirm_access: true,
        }
    }
}

/// Terminal output preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Lines of each file shown after a scan. `0` hides contents.
    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            preview_lines: default_preview_lines(),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_suffix() -> String {
    ".rs".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d %H:%M".to_string()
}

fn default_preview_lines() -> usize {
    3
}

fn default_log_file() -> PathBuf {
    PathBuf::from("/tmp/srcsync.log")
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_scan() {
        let config = Config::default();

        assert_eq!(config.scan.suffix, ".rs");
        assert!(config.scan.confirm_access);
    }

    #[test]
    fn default_config_ui_and_log() {
        let config = Config::default();

        assert_eq!(config.ui.date_format, "%Y-%m-%d %H:%M");
        assert_eq!(config.ui.preview_lines, 3);
        assert_eq!(config.log.file, PathBuf::from("/tmp/srcsync.log"));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[scan]
suffix = ".py"
confirm_access = false

[ui]
date_format = "%d/%m/%Y"
preview_lines = 0

[log]
file = "/var/log/srcsync.log"
level = "debug"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.scan.suffix, ".py");
        assert!(!config.scan.confirm_access);
        assert_eq!(config.ui.date_format, "%d/%m/%Y");
        assert_eq!(config.ui.preview_lines, 0);
        assert_eq!(config.log.file, PathBuf::from("/var/log/srcsync.log"));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn load_partial_toml_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[scan]\nsuffix = \".ts\"\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.scan.suffix, ".ts");
        assert!(config.scan.confirm_access);
        assert_eq!(config.ui.preview_lines, 3);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn load_empty_toml_uses_all_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.scan.suffix, Config::default().scan.suffix);
    }

    #[test]
    fn load_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nonexistent.toml"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config.scan.suffix, ".rs");
    }

    #[test]
    fn load_invalid_toml_returns_config_parse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid [[[toml").unwrap();

        assert!(matches!(
            Config::load(&path).unwrap_err(),
            CoreError::ConfigParse(_)
        ));
        assert!(matches!(
            Config::load_or_default(&path).unwrap_err(),
            CoreError::ConfigParse(_)
        ));
    }

    #[test]
    fn default_path_ends_in_srcsync_config() {
        let path = Config::default_path();
        assert!(path.ends_with(".config/srcsync/config.toml"));
    }
}
