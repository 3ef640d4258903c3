//! Append-only processing log.
//!
//! One [`ProcessingLog`] is opened per run by the caller and handed to the
//! pipeline. Each event becomes one line:
//!
//! ```text
//! 2024-03-09 14:02:11,417 - INFO - Successfully verified: vial.jpg
//! ```
//!
//! Every event is mirrored to `tracing` at the same level. Write failures are
//! reported through `tracing` and otherwise ignored.

use chrono::Local;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ExportError, ExportResult};

/// Timestamp format for log lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Log line severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Handle to the run's processing log. Flushed on drop.
pub struct ProcessingLog {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl ProcessingLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> ExportResult<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ExportError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Some(BufWriter::new(file)),
        })
    }

    /// A log that only mirrors to `tracing`.
    pub fn disabled() -> Self {
        Self {
            path: PathBuf::new(),
            writer: None,
        }
    }

    /// Path of the log file (empty for a disabled log).
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        self.record(Severity::Info, message.as_ref());
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.record(Severity::Warning, message.as_ref());
    }

    pub fn error(&mut self, message: impl AsRef<str>) {
        self.record(Severity::Error, message.as_ref());
    }

    /// Append one line.
    pub fn record(&mut self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }

        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        let line = format_line(&Local::now().format(TIMESTAMP_FORMAT), severity, message);
        if let Err(e) = writer.write_all(line.as_bytes()) {
            tracing::warn!("Failed to write processing log {:?}: {e}", self.path);
        }
    }

    /// Flush buffered lines to disk.
    pub fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.flush() {
                tracing::warn!("Failed to flush processing log {:?}: {e}", self.path);
            }
        }
    }
}

impl Drop for ProcessingLog {
    fn drop(&mut self) {
        self.flush();
    }
}

fn format_line(timestamp: &impl fmt::Display, severity: Severity, message: &str) -> String {
    format!("{timestamp} - {severity} - {message}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let line = format_line(&"2024-03-09 14:02:11,417", Severity::Error, "boom");
        assert_eq!(line, "2024-03-09 14:02:11,417 - ERROR - boom\n");
    }

    #[test]
    fn test_log_appends_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processing.log");

        {
            let mut log = ProcessingLog::open(&path).unwrap();
            log.info("first run");
        }
        {
            let mut log = ProcessingLog::open(&path).unwrap();
            log.warn("second run");
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - INFO - first run"));
        assert!(lines[1].ends_with(" - WARNING - second run"));
        // "YYYY-MM-DD HH:MM:SS,mmm"
        assert_eq!(lines[0].split(" - ").next().unwrap().len(), 23);
    }

    #[test]
    fn test_disabled_log_writes_nothing() {
        let mut log = ProcessingLog::disabled();
        log.error("nowhere");
        assert_eq!(log.path(), Path::new(""));
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let err = ProcessingLog::open(Path::new("/nonexistent/dir/processing.log"));
        assert!(err.is_err());
    }
}
