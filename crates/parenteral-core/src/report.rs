//! Verification summary for one run.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write as _;

use crate::types::FailedImage;

/// Counts and failures of a run, rendered to `verification_report.txt`.
///
/// Built from the per-image outcomes, so `total_found == succeeded +
/// failed.len()` holds by construction.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    /// When the run started
    pub generated_at: NaiveDateTime,

    /// Candidates discovered by the scanner
    pub total_found: usize,

    /// Images that produced a record
    pub succeeded: usize,

    /// Images excluded from the output, in discovery order
    pub failed: Vec<FailedImage>,
}

impl VerificationReport {
    pub fn new(generated_at: NaiveDateTime, succeeded: usize, failed: Vec<FailedImage>) -> Self {
        Self {
            generated_at,
            total_found: succeeded + failed.len(),
            succeeded,
            failed,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// `succeeded / total_found * 100`, or 0 when nothing was found.
    pub fn processing_rate(&self) -> f64 {
        if self.total_found == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total_found as f64 * 100.0
        }
    }

    /// Plain-text report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Verification Report - {}",
            self.generated_at.format("%Y-%m-%d %H:%M:%S")
        );
        let _ = writeln!(out, "Total images in directory: {}", self.total_found);
        let _ = writeln!(out, "Successfully processed images: {}", self.succeeded);
        let _ = writeln!(out, "Failed images: {}", self.failed_count());
        let _ = writeln!(out, "Processing rate: {:.2}%", self.processing_rate());

        if self.total_found == 0 {
            let _ = writeln!(out, "\nNo image files found.");
        } else if self.succeeded == 0 {
            let _ = writeln!(out, "\nNo files were processed successfully.");
        }

        if !self.failed.is_empty() {
            let _ = writeln!(out, "\nFailed Images:");
            for failure in &self.failed {
                let _ = writeln!(out, "- {}: {}", failure.path, failure.reason);
            }
        }
        out
    }
}
