//! Sub-configuration structs with defaults matching the original scripts.

use crate::output::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the scan root is traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Only files directly under the root
    #[default]
    Flat,
    /// Descend into every subdirectory
    Recursive,
}

/// How thoroughly each candidate is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifyMode {
    /// Parse the header and walk JPEG/PNG structure to its end, without decoding pixels
    #[default]
    Header,
    /// Decode every pixel; also catches corrupt compressed data
    Decode,
}

/// Directory scanning settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Flat or recursive traversal
    pub mode: ScanMode,

    /// Accepted file extensions (case-insensitive, without the dot)
    pub extensions: Vec<String>,

    /// Follow symbolic links during recursive scans
    pub follow_links: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::Flat,
            extensions: vec!["jpg".to_string(), "jpeg".to_string()],
            follow_links: false,
        }
    }
}

/// Image verification settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyConfig {
    /// Header-only or full-decode verification
    pub mode: VerifyMode,
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
        }
    }
}

/// Which optional record fields are derived.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Fill `category` from the first directory below the root
    pub extract_category: bool,

    /// Fill `concentration` from the file name (e.g. `500mg`)
    pub extract_concentration: bool,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            extract_category: true,
            extract_concentration: true,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving all run artifacts (created if absent)
    pub dir: PathBuf,

    /// File stem for the data exports (`<stem>.csv`, `<stem>.xlsx`, ...)
    pub file_stem: String,

    /// Data export formats
    pub formats: Vec<ExportFormat>,

    /// Verification report file name
    pub report_file: String,

    /// Processing log file name
    pub log_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("metadata"),
            file_stem: "parenteral_metadata".to_string(),
            formats: vec![ExportFormat::Csv],
            report_file: "verification_report.txt".to_string(),
            log_file: "processing.log".to_string(),
        }
    }
}

/// Console logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
