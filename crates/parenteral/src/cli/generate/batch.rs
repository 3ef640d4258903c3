//! Batch verification with progress, and the final console summary.

use parenteral_core::{
    ExportSummary, ImageCandidate, MetadataPipeline, ProcessingLog, RunOutcome, VerificationReport,
};
use std::path::Path;
use std::time::{Duration, Instant};

/// Verify every candidate with a progress bar on stderr.
///
/// The bar shows throughput only. Failure counts come from the final report,
/// which also includes images whose record could not be built.
pub fn process_batch(
    pipeline: &MetadataPipeline,
    candidates: Vec<ImageCandidate>,
    log: &mut ProcessingLog,
) -> RunOutcome {
    let progress = create_progress_bar(candidates.len() as u64);
    let start_time = Instant::now();
    let mut processed: u64 = 0;

    let run = pipeline.process(candidates, log, |_| {
        processed += 1;
        progress.inc(1);
        if let Some(message) = rate_message(processed, start_time.elapsed()) {
            progress.set_message(message);
        }
    });

    progress.finish_and_clear();
    tracing::debug!(
        "Batch finished: {} succeeded, {} failed",
        run.report.succeeded,
        run.report.failed_count()
    );
    run
}

/// Throughput label for the progress bar, once any time has elapsed.
fn rate_message(processed: u64, elapsed: Duration) -> Option<String> {
    let secs = elapsed.as_secs_f64();
    (secs > 0.0).then(|| format!("{:.1} img/sec", processed as f64 / secs))
}

/// Create a progress bar for batch verification.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb
}

/// Print the run summary to stdout.
pub fn print_summary(report: &VerificationReport, summary: &ExportSummary, log_path: &Path) {
    print!("{}", render_summary(report, summary, log_path));
}

fn render_summary(report: &VerificationReport, summary: &ExportSummary, log_path: &Path) -> String {
    let mut lines = vec![
        String::new(),
        "Image Verification Summary:".to_string(),
        format!("  Total image files found: {}", report.total_found),
        format!("  Successfully processed:  {}", report.succeeded),
        format!("  Failed to process:       {}", report.failed_count()),
        format!("  Processing rate:         {:.2}%", report.processing_rate()),
    ];

    if !report.failed.is_empty() {
        lines.push(String::new());
        lines.push("Failed Images:".to_string());
        for failure in &report.failed {
            lines.push(format!("  - {}: {}", failure.path, failure.reason));
        }
    }

    lines.push(String::new());
    if summary.data_files.is_empty() {
        lines.push("No files were processed successfully; no metadata file written.".to_string());
    } else {
        lines.push("Metadata written to:".to_string());
        for path in &summary.data_files {
            lines.push(format!("  - {}", path.display()));
        }
    }
    lines.push(format!("Verification report: {}", summary.report_file.display()));
    lines.push(format!("Processing log:      {}", log_path.display()));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use parenteral_core::FailedImage;
    use std::path::PathBuf;

    fn report(succeeded: usize, failed: Vec<FailedImage>) -> VerificationReport {
        let generated_at = "2024-03-09T09:00:00".parse().unwrap();
        VerificationReport::new(generated_at, succeeded, failed)
    }

    #[test]
    fn rate_message_reports_throughput() {
        assert_eq!(rate_message(5, Duration::ZERO), None);
        assert_eq!(
            rate_message(5, Duration::from_secs(2)).as_deref(),
            Some("2.5 img/sec")
        );
    }

    #[test]
    fn batch_counts_match_report() {
        let dir = tempfile::tempdir().unwrap();
        image::ImageBuffer::from_pixel(4, 4, image::Rgb([5u8, 5, 5]))
            .save_with_format(dir.path().join("ok.jpg"), image::ImageFormat::Jpeg)
            .unwrap();
        std::fs::write(dir.path().join("bad.jpg"), b"nope").unwrap();

        let pipeline = MetadataPipeline::new(&parenteral_core::Config::default());
        let candidates = pipeline.discover(dir.path()).unwrap();
        let run = process_batch(&pipeline, candidates, &mut ProcessingLog::disabled());

        assert_eq!(run.records.len(), run.report.succeeded);
        assert_eq!(run.report.total_found, 2);
        assert_eq!(run.report.failed_count(), 1);
    }

    #[test]
    fn summary_lists_failures_and_files() {
        let report = report(
            1,
            vec![FailedImage {
                path: "bad.jpg".to_string(),
                reason: "Unrecognized image format".to_string(),
            }],
        );
        let summary = ExportSummary {
            data_files: vec![PathBuf::from("metadata/parenteral_metadata.csv")],
            report_file: PathBuf::from("metadata/verification_report.txt"),
        };

        let text = render_summary(&report, &summary, Path::new("metadata/processing.log"));
        assert!(text.contains("Total image files found: 2"));
        assert!(text.contains("Processing rate:         50.00%"));
        assert!(text.contains("  - bad.jpg: Unrecognized image format"));
        assert!(text.contains("  - metadata/parenteral_metadata.csv"));
    }

    #[test]
    fn summary_for_empty_run() {
        let report = report(0, vec![]);
        let summary = ExportSummary {
            data_files: vec![],
            report_file: PathBuf::from("metadata/verification_report.txt"),
        };

        let text = render_summary(&report, &summary, Path::new("metadata/processing.log"));
        assert!(text.contains("Processing rate:         0.00%"));
        assert!(text.contains("No files were processed successfully"));
    }
}
