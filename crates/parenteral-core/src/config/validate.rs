//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::ValidationError(
                "scan.extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .scan
            .extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(ConfigError::ValidationError(format!(
                "scan.extensions entries must be bare suffixes without a dot, got {ext:?}"
            )));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.output.dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "output.dir must not be empty".into(),
            ));
        }
        if self.output.file_stem.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "output.file_stem must not be empty".into(),
            ));
        }
        if self.output.report_file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "output.report_file must not be empty".into(),
            ));
        }
        if self.output.log_file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "output.log_file must not be empty".into(),
            ));
        }
        Ok(())
    }
}
