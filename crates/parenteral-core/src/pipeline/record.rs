//! Record construction for verified images.

use chrono::{DateTime, Local, NaiveDate};
use std::path::Path;

use crate::config::{RecordConfig, VerifyMode};
use crate::error::{PipelineError, PipelineResult};
use crate::types::{ImageCandidate, MetadataRecord, STATUS_SUCCESS};

use super::concentration::extract_concentration;
use super::verify::probe;

/// Date format for `date_added` and `last_modified`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds one [`MetadataRecord`] per verified image.
pub struct RecordBuilder {
    config: RecordConfig,
    date_added: String,
}

impl RecordBuilder {
    /// Create a builder stamping every record with `run_date`.
    pub fn new(config: RecordConfig, run_date: NaiveDate) -> Self {
        Self {
            config,
            date_added: run_date.format(DATE_FORMAT).to_string(),
        }
    }

    /// Build the record for `candidate`.
    ///
    /// Size, modification time and dimensions are read fresh from disk here,
    /// independently of the verification pass.
    pub fn build(&self, candidate: &ImageCandidate) -> PipelineResult<MetadataRecord> {
        let path = candidate.path.as_path();
        let metadata = std::fs::metadata(path).map_err(|e| metadata_error(path, e))?;
        let modified = metadata.modified().map_err(|e| metadata_error(path, e))?;
        let image = probe(path, VerifyMode::Header)?;

        let file_name = candidate.file_name();
        let category = if self.config.extract_category {
            candidate.category.clone().unwrap_or_default()
        } else {
            String::new()
        };
        let concentration = if self.config.extract_concentration {
            extract_concentration(&file_name).to_string()
        } else {
            String::new()
        };

        Ok(MetadataRecord {
            category,
            relative_path: candidate.display_path(),
            file_name,
            medication_name: String::new(),
            generic_name: String::new(),
            concentration,
            volume_ml: String::new(),
            manufacturer: String::new(),
            ndc_code: String::new(),
            lot_number: String::new(),
            expiration_date: String::new(),
            storage_requirements: String::new(),
            image_width: image.width,
            image_height: image.height,
            image_format: image.format,
            file_size_kb: size_kb(metadata.len()),
            date_added: self.date_added.clone(),
            last_modified: DateTime::<Local>::from(modified)
                .format(DATE_FORMAT)
                .to_string(),
            processing_status: STATUS_SUCCESS.to_string(),
            notes: String::new(),
        })
    }
}

/// `bytes / 1024` rounded to two decimals, half away from zero.
pub fn size_kb(bytes: u64) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}

fn metadata_error(path: &Path, e: std::io::Error) -> PipelineError {
    PipelineError::Metadata {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}
