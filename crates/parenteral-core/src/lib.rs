//! Parenteral Core - image verification and metadata export.
//!
//! Walks a directory of product images, verifies each file is a readable
//! image, and exports one metadata row per image for later manual curation.
//!
//! # Architecture
//!
//! A single sequential pipeline with no database or network access:
//!
//! ```text
//! Scan → Verify → Build Record → Export (CSV / XLSX / JSON + report)
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use parenteral_core::{Config, Exporter, MetadataPipeline, ProcessingLog};
//! use std::path::Path;
//!
//! fn main() -> parenteral_core::Result<()> {
//!     let config = Config::load()?;
//!     let exporter = Exporter::new(config.output_dir(), &config.output);
//!     exporter.prepare()?;
//!
//!     let mut log = ProcessingLog::open(&exporter.dir().join(&config.output.log_file))?;
//!     let run = MetadataPipeline::new(&config).run(Path::new("./Parenterals"), &mut log)?;
//!     exporter.export(&run.records, &run.report)?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod log;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, ExportError, MetadataError, PipelineError, PipelineResult, Result};
pub use log::{ProcessingLog, Severity};
pub use output::{ExportFormat, ExportSummary, Exporter};
pub use pipeline::{MetadataPipeline, RunOutcome};
pub use report::VerificationReport;
pub use types::{FailedImage, ImageCandidate, ImageProbe, MetadataRecord, VerificationOutcome};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
