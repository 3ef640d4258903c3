//! Pipeline orchestration: scan, verify, build records.

use chrono::Local;
use std::path::Path;

use crate::config::Config;
use crate::error::{MetadataError, Result};
use crate::log::ProcessingLog;
use crate::report::VerificationReport;
use crate::types::{FailedImage, ImageCandidate, MetadataRecord, VerificationOutcome};

use super::discovery::FileDiscovery;
use super::record::RecordBuilder;
use super::verify::ImageVerifier;

/// Records and report produced by one run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// One record per successfully processed image, in discovery order
    pub records: Vec<MetadataRecord>,

    /// Counts and failures
    pub report: VerificationReport,
}

/// The metadata pipeline: Scanner -> Verifier -> Record Builder.
///
/// Export is a separate step (see [`crate::output::Exporter`]) so callers can
/// decide what to do with an empty run.
pub struct MetadataPipeline {
    discovery: FileDiscovery,
    verifier: ImageVerifier,
    config: Config,
}

impl MetadataPipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            discovery: FileDiscovery::new(config.scan.clone()),
            verifier: ImageVerifier::new(config.limits.clone(), config.verify.mode),
            config: config.clone(),
        }
    }

    /// Find candidate images under `root`.
    ///
    /// Fails only when `root` is not an existing directory.
    pub fn discover(&self, root: &Path) -> Result<Vec<ImageCandidate>> {
        if !root.is_dir() {
            return Err(MetadataError::InputNotFound(root.to_path_buf()));
        }
        Ok(self.discovery.discover(root))
    }

    /// Discover and process everything under `root`.
    pub fn run(&self, root: &Path, log: &mut ProcessingLog) -> Result<RunOutcome> {
        let candidates = self.discover(root)?;
        Ok(self.process(candidates, log, |_| {}))
    }

    /// Verify each candidate and build records for the ones that pass.
    ///
    /// Per-image failures are logged and collected, never returned.
    /// `on_outcome` is called once per candidate, after verification.
    pub fn process<F>(
        &self,
        candidates: Vec<ImageCandidate>,
        log: &mut ProcessingLog,
        mut on_outcome: F,
    ) -> RunOutcome
    where
        F: FnMut(&VerificationOutcome),
    {
        let started = Local::now();
        let builder = RecordBuilder::new(self.config.record.clone(), started.date_naive());

        log.info(format!("Found {} total image files", candidates.len()));

        let mut records = Vec::with_capacity(candidates.len());
        let mut failed = Vec::new();

        for candidate in candidates {
            let outcome = self.verifier.verify(candidate);
            on_outcome(&outcome);

            match outcome {
                VerificationOutcome::Verified { candidate, probe } => {
                    let shown = candidate.display_path();
                    log.info(format!(
                        "Successfully verified: {shown} ({}x{} {})",
                        probe.width, probe.height, probe.format
                    ));

                    match builder.build(&candidate) {
                        Ok(record) => {
                            tracing::debug!("Processed: {shown}");
                            records.push(record);
                        }
                        Err(e) => {
                            log.error(format!(
                                "Error during metadata extraction for {shown}: {e}"
                            ));
                            failed.push(FailedImage {
                                path: shown,
                                reason: e.to_string(),
                            });
                        }
                    }
                }
                VerificationOutcome::Failed { candidate, reason } => {
                    let shown = candidate.display_path();
                    log.error(format!("Failed to process: {shown} - Error: {reason}"));
                    failed.push(FailedImage {
                        path: shown,
                        reason,
                    });
                }
            }
        }

        let report = VerificationReport::new(started.naive_local(), records.len(), failed);
        log.info(format!(
            "Run finished: {} found, {} succeeded, {} failed",
            report.total_found,
            report.succeeded,
            report.failed_count()
        ));
        log.flush();

        RunOutcome { records, report }
    }
}
