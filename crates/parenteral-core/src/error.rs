//! Error types for the metadata pipeline.
//!
//! Errors are split by scope: per-image failures ([`PipelineError`]) are
//! recovered and counted by the pipeline, while configuration and export
//! failures ([`ConfigError`], [`ExportError`]) end the run.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for pipeline operations.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Per-image pipeline errors that escaped the batch loop
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Output could not be produced
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// The scan root is missing or not a directory
    #[error("Input directory not found: {0}")]
    InputNotFound(PathBuf),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-image errors. These never abort a batch; their `Display` text becomes
/// the failure reason in the verification report.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The image container could not be parsed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Filesystem metadata could not be read while building a record
    #[error("Metadata extraction failed for {path}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

/// Errors writing run artifacts. All of these are fatal for the run.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The output directory could not be created
    #[error("Cannot create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact could not be written or moved into place
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Delimited-text serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet generation failed
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for pipeline results.
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Convenience type alias for per-image results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// Convenience type alias for export results.
pub type ExportResult<T> = std::result::Result<T, ExportError>;
