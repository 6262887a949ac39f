//! Configuration file handling for ~/.gsvpd/config.ini.
//!
//! Every key is optional; missing keys keep their defaults and command-line
//! flags override whatever the file sets.
//!
//! ```ini
//! [download]
//! timeout = 30
//! max_retries = 3
//! retry_base_delay_ms = 200
//!
//! [concurrency]
//! max_panoramas = 50
//! max_tiles = 100
//! workers = 20
//! connections = 100
//! connections_per_host = 100
//!
//! [output]
//! directory = ~/panoramas
//! jpeg_quality = 90
//!
//! [logging]
//! file = ~/.gsvpd/gsvpd.log
//! ```

use super::concurrency::ConcurrencyConfig;
use super::defaults::{DEFAULT_JPEG_QUALITY, DEFAULT_LOG_FILE_NAME};
use super::download::DownloadConfig;
use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Settings loaded from the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// `[download]` section
    pub download: DownloadConfig,
    /// `[concurrency]` section
    pub concurrency: ConcurrencyConfig,
    /// `[output] directory`; the current directory when unset
    pub output_dir: Option<PathBuf>,
    /// `[output] jpeg_quality`, 1 to 100
    pub jpeg_quality: u8,
    /// `[logging] file`
    pub log_file: PathBuf,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            download: DownloadConfig::default(),
            concurrency: ConcurrencyConfig::default(),
            output_dir: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            log_file: config_directory().join(DEFAULT_LOG_FILE_NAME),
        }
    }
}

impl ConfigFile {
    /// Load configuration from the default path (~/.gsvpd/config.ini).
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }
}

/// Get the path to the config directory (~/.gsvpd).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gsvpd")
}

/// Get the path to the config file (~/.gsvpd/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}

/// Expand a leading `~` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(
            &config_path,
            "[download]\ntimeout = 12\n\n[concurrency]\nworkers = 6\n\n[output]\ndirectory = /data/panos\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(config.download.request_timeout(), Duration::from_secs(12));
        assert_eq!(config.concurrency.workers(), 6);
        assert_eq!(config.output_dir, Some(PathBuf::from("/data/panos")));
    }

    #[test]
    fn test_invalid_value_reported() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, "[concurrency]\nworkers = many\n").unwrap();

        let err = ConfigFile::load_from(&config_path).unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { .. }));
        assert!(err.to_string().contains("concurrency.workers"));
    }

    #[test]
    fn test_expand_tilde() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/panos"), home.join("panos"));
        }
    }

    #[test]
    fn test_config_file_path() {
        let path = config_file_path();
        assert!(path.ends_with(".gsvpd/config.ini"));
    }
}
