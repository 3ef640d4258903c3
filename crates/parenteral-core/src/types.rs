//! Core data types flowing through the metadata pipeline.
//!
//! A run turns [`ImageCandidate`]s into [`VerificationOutcome`]s, and each
//! verified image into one [`MetadataRecord`].

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Category label for files sitting directly under the scan root.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Number of exported columns.
pub const COLUMN_COUNT: usize = 20;

/// Value of `processing_status` for every exported record.
pub const STATUS_SUCCESS: &str = "success";

/// A file discovered by the scanner, not yet verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Full path to the file
    pub path: PathBuf,

    /// Path relative to the scan root
    pub relative_path: PathBuf,

    /// First directory below the root (recursive scans only)
    pub category: Option<String>,
}

impl ImageCandidate {
    /// Just the filename portion.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Relative path rendered with `/` separators on every platform.
    pub fn display_path(&self) -> String {
        self.relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// What the verifier learned from a structurally valid image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageProbe {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Detected container format ("JPEG", "PNG", ...)
    pub format: String,
}

/// Result of checking one candidate.
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    /// The image opened and its header parsed
    Verified {
        candidate: ImageCandidate,
        probe: ImageProbe,
    },
    /// The image could not be opened; `reason` is the error text verbatim
    Failed {
        candidate: ImageCandidate,
        reason: String,
    },
}

impl VerificationOutcome {
    /// The candidate this outcome belongs to.
    pub fn candidate(&self) -> &ImageCandidate {
        match self {
            Self::Verified { candidate, .. } | Self::Failed { candidate, .. } => candidate,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// An image that did not make it into the exported records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedImage {
    /// Path relative to the scan root
    pub path: String,

    /// Error description
    pub reason: String,
}

/// One exported row.
///
/// Field order is the column order of every export format. The empty
/// placeholders are filled in by hand after export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    // === Location ===
    /// Directory-derived category, empty when not extracted
    pub category: String,

    pub file_name: String,

    /// Path relative to the scan root, `/`-separated
    pub relative_path: String,

    // === Manual entry ===
    pub medication_name: String,
    pub generic_name: String,

    /// Parsed from the file name (e.g. "500mg"), empty if absent
    pub concentration: String,

    pub volume_ml: String,
    pub manufacturer: String,
    pub ndc_code: String,
    pub lot_number: String,
    pub expiration_date: String,
    pub storage_requirements: String,

    // === Image properties ===
    /// Image width in pixels
    pub image_width: u32,

    /// Image height in pixels
    pub image_height: u32,

    /// Container format tag ("JPEG", "PNG", ...)
    pub image_format: String,

    /// `bytes / 1024`, rounded to two decimals
    pub file_size_kb: f64,

    // === Dates (YYYY-MM-DD) ===
    /// Date of the run that produced this record
    pub date_added: String,

    /// Filesystem modification date of the source file
    pub last_modified: String,

    // === Bookkeeping ===
    pub processing_status: String,
    pub notes: String,
}

impl MetadataRecord {
    /// Column names in export order.
    pub const COLUMNS: [&'static str; COLUMN_COUNT] = [
        "category",
        "file_name",
        "relative_path",
        "medication_name",
        "generic_name",
        "concentration",
        "volume_ml",
        "manufacturer",
        "ndc_code",
        "lot_number",
        "expiration_date",
        "storage_requirements",
        "image_width",
        "image_height",
        "image_format",
        "file_size_kb",
        "date_added",
        "last_modified",
        "processing_status",
        "notes",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(relative: &str) -> ImageCandidate {
        ImageCandidate {
            path: PathBuf::from("/root").join(relative),
            relative_path: PathBuf::from(relative),
            category: None,
        }
    }

    #[test]
    fn test_candidate_file_name() {
        assert_eq!(candidate("Antibiotics/vial.jpg").file_name(), "vial.jpg");
    }

    #[test]
    fn test_candidate_display_path_uses_forward_slashes() {
        let c = candidate("Antibiotics/sub/vial.jpg");
        assert_eq!(c.display_path(), "Antibiotics/sub/vial.jpg");
    }

    #[test]
    fn test_outcome_candidate_accessor() {
        let failed = VerificationOutcome::Failed {
            candidate: candidate("bad.jpg"),
            reason: "truncated".to_string(),
        };
        assert_eq!(failed.candidate().file_name(), "bad.jpg");
        assert!(!failed.is_verified());
    }

    #[test]
    fn test_columns_match_serialized_field_order() {
        let record = MetadataRecord {
            category: String::new(),
            file_name: "a.jpg".to_string(),
            relative_path: "a.jpg".to_string(),
            medication_name: String::new(),
            generic_name: String::new(),
            concentration: String::new(),
            volume_ml: String::new(),
            manufacturer: String::new(),
            ndc_code: String::new(),
            lot_number: String::new(),
            expiration_date: String::new(),
            storage_requirements: String::new(),
            image_width: 1,
            image_height: 1,
            image_format: "JPEG".to_string(),
            file_size_kb: 0.5,
            date_added: "2024-01-01".to_string(),
            last_modified: "2024-01-01".to_string(),
            processing_status: STATUS_SUCCESS.to_string(),
            notes: String::new(),
        };
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&record).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let header: Vec<&str> = text.lines().next().unwrap().split(',').collect();
        assert_eq!(header, MetadataRecord::COLUMNS);
    }
}
