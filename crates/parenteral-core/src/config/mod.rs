//! Configuration management.
//!
//! Configuration is loaded from the platform config directory with defaults
//! for every field, so a missing or partial file is fine.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanning
    pub scan: ScanConfig,

    /// Image verification
    pub verify: VerifyConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Record field derivation
    pub record: RecordConfig,

    /// Output artifacts
    pub output: OutputConfig,

    /// Console logging
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.parenteral.parenteral/config.toml
    /// - Linux: ~/.config/parenteral/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\parenteral\config\config.toml
    ///
    /// Falls back to ~/.parenteral/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "parenteral", "parenteral")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".parenteral").join("config.toml")
            })
    }

    /// Get the resolved output directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        let path_str = self.output.dir.to_string_lossy();
        let expanded = shellexpand::tilde(&path_str);
        PathBuf::from(expanded.into_owned())
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ExportFormat;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan.mode, ScanMode::Flat);
        assert_eq!(config.verify.mode, VerifyMode::Header);
        assert_eq!(config.limits.max_file_size_mb, 100);
        assert_eq!(config.output.formats, vec![ExportFormat::Csv]);
        assert_eq!(config.output.dir, PathBuf::from("metadata"));
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[scan]"));
        assert!(toml.contains("[output]"));
        assert!(toml.contains("mode = \"flat\""));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[scan]\nmode = \"recursive\"\n\n[output]\nformats = [\"csv\", \"xlsx\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.scan.mode, ScanMode::Recursive);
        assert_eq!(config.scan.extensions, vec!["jpg", "jpeg"]);
        assert_eq!(
            config.output.formats,
            vec![ExportFormat::Csv, ExportFormat::Xlsx]
        );
        assert_eq!(config.output.report_file, "verification_report.txt");
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scan]\nextensions = []\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_load_from_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[scan\nmode = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
