//! End-to-end runs over generated image directories.

use image::{ImageBuffer, ImageFormat, Rgb};
use parenteral_core::config::ScanMode;
use parenteral_core::pipeline::size_kb;
use parenteral_core::{
    Config, ExportFormat, Exporter, MetadataPipeline, MetadataRecord, ProcessingLog, RunOutcome,
};
use std::fs;
use std::path::Path;

fn write_jpeg(root: &Path, relative: &str, width: u32, height: u32) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    ImageBuffer::from_pixel(width, height, Rgb([120u8, 60, 200]))
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();
}

fn write_corrupt(root: &Path, relative: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"definitely not a jpeg").unwrap();
}

fn run(config: &Config, root: &Path, log_path: &Path) -> RunOutcome {
    let mut log = ProcessingLog::open(log_path).unwrap();
    MetadataPipeline::new(config).run(root, &mut log).unwrap()
}

fn recursive_config() -> Config {
    let mut config = Config::default();
    config.scan.mode = ScanMode::Recursive;
    config
}

#[test]
fn corrupt_image_is_reported_and_run_completes() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_jpeg(images.path(), "a_250mg.jpg", 30, 20);
    write_corrupt(images.path(), "b_broken.jpg");
    write_jpeg(images.path(), "c.JPEG", 10, 10);
    fs::write(images.path().join("readme.txt"), "ignored").unwrap();

    let outcome = run(&Config::default(), images.path(), &out.path().join("processing.log"));
    let report = &outcome.report;

    assert_eq!(report.total_found, 3);
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.total_found, report.succeeded + report.failed_count());
    assert_eq!(report.failed[0].path, "b_broken.jpg");
    assert!(!report.failed[0].reason.is_empty());

    let names: Vec<&str> = outcome.records.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["a_250mg.jpg", "c.JPEG"]);
}

#[test]
fn truncated_jpeg_fails_with_default_config() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let full = images.path().join("full.jpg");
    ImageBuffer::from_fn(256, 256, |x, y| {
        Rgb([(x * 3 + y) as u8, (x ^ y) as u8, (y * 5) as u8])
    })
    .save_with_format(&full, ImageFormat::Jpeg)
    .unwrap();
    let bytes = fs::read(&full).unwrap();
    fs::write(images.path().join("half.jpg"), &bytes[..bytes.len() / 2]).unwrap();

    let outcome = run(&Config::default(), images.path(), &out.path().join("processing.log"));
    let report = &outcome.report;

    assert_eq!(report.total_found, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].path, "half.jpg");
    assert!(report.failed[0].reason.contains("Truncated"));

    let names: Vec<&str> = outcome.records.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["full.jpg"]);
}

#[test]
fn file_sizes_match_disk() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_jpeg(images.path(), "x.jpg", 64, 64);
    write_jpeg(images.path(), "y.jpg", 3, 7);

    let outcome = run(&Config::default(), images.path(), &out.path().join("p.log"));
    for record in &outcome.records {
        let bytes = fs::metadata(images.path().join(&record.relative_path))
            .unwrap()
            .len();
        assert!(record.file_size_kb >= 0.0);
        assert_eq!(record.file_size_kb, size_kb(bytes));
    }
}

#[test]
fn recursive_scan_categories_and_concentration() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_jpeg(images.path(), "Antibiotics/drug_500mg_lot1.jpg", 8, 8);
    write_jpeg(images.path(), "drug_plain.jpg", 8, 8);

    let outcome = run(&recursive_config(), images.path(), &out.path().join("p.log"));
    let by_name = |name: &str| -> &MetadataRecord {
        outcome
            .records
            .iter()
            .find(|r| r.file_name == name)
            .unwrap()
    };

    let dosed = by_name("drug_500mg_lot1.jpg");
    assert_eq!(dosed.category, "Antibiotics");
    assert_eq!(dosed.concentration, "500mg");
    assert_eq!(dosed.relative_path, "Antibiotics/drug_500mg_lot1.jpg");

    let plain = by_name("drug_plain.jpg");
    assert_eq!(plain.category, "uncategorized");
    assert_eq!(plain.concentration, "");
}

#[test]
fn flat_scan_leaves_category_empty() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_jpeg(images.path(), "top.jpg", 8, 8);
    write_jpeg(images.path(), "Antibiotics/nested.jpg", 8, 8);

    let outcome = run(&Config::default(), images.path(), &out.path().join("p.log"));
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].category, "");
}

#[test]
fn rerun_is_identical_except_date_added() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_jpeg(images.path(), "Vaccines/a_0.5ml.jpg", 12, 9);
    write_jpeg(images.path(), "b.jpg", 5, 5);
    let log = out.path().join("p.log");

    let normalize = |mut records: Vec<MetadataRecord>| {
        for record in &mut records {
            record.date_added.clear();
        }
        records
    };

    let first = run(&recursive_config(), images.path(), &log);
    let second = run(&recursive_config(), images.path(), &log);
    assert_eq!(normalize(first.records), normalize(second.records));
}

#[test]
fn no_valid_images_writes_no_data_file() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_corrupt(images.path(), "only.jpg");

    let config = Config::default();
    let outcome = run(&config, images.path(), &out.path().join("p.log"));
    assert_eq!(outcome.report.succeeded, 0);
    assert_eq!(outcome.report.processing_rate(), 0.0);

    let exporter = Exporter::new(out.path().to_path_buf(), &config.output);
    let summary = exporter.export(&outcome.records, &outcome.report).unwrap();
    assert!(summary.data_files.is_empty());
    assert!(!out.path().join("parenteral_metadata.csv").exists());

    let report = fs::read_to_string(out.path().join("verification_report.txt")).unwrap();
    assert!(report.contains("Successfully processed images: 0"));
    assert!(report.contains("Processing rate: 0.00%"));
    assert!(report.contains("- only.jpg: "));
}

#[test]
fn empty_directory_reports_zero_rate() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let outcome = run(&Config::default(), images.path(), &out.path().join("p.log"));
    assert_eq!(outcome.report.total_found, 0);
    assert!(outcome
        .report
        .render()
        .contains("Processing rate: 0.00%"));
}

#[test]
fn exported_csv_matches_records() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_jpeg(images.path(), "Antibiotics/cefazolin_1000mg.jpg", 40, 30);
    write_jpeg(images.path(), "Analgesics/ketorolac_30mg.jpg", 20, 20);

    let mut config = recursive_config();
    config.output.formats = vec![ExportFormat::Csv, ExportFormat::Xlsx];
    let outcome = run(&config, images.path(), &out.path().join("processing.log"));

    let exporter = Exporter::new(out.path().to_path_buf(), &config.output);
    exporter.export(&outcome.records, &outcome.report).unwrap();

    let csv_path = out.path().join("parenteral_metadata.csv");
    let header = fs::read_to_string(&csv_path)
        .unwrap()
        .lines()
        .next()
        .unwrap()
        .to_string();
    assert_eq!(header, MetadataRecord::COLUMNS.join(","));

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let parsed: Vec<MetadataRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(parsed, outcome.records);
    assert!(out.path().join("parenteral_metadata.xlsx").exists());
}

#[test]
fn processing_log_records_every_outcome() {
    let images = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    write_jpeg(images.path(), "good.jpg", 8, 8);
    write_corrupt(images.path(), "bad.jpg");
    let log_path = out.path().join("processing.log");

    run(&Config::default(), images.path(), &log_path);

    let log = fs::read_to_string(&log_path).unwrap();
    assert!(log.contains(" - INFO - Found 2 total image files"));
    assert!(log.contains(" - INFO - Successfully verified: good.jpg"));
    assert!(log.contains(" - ERROR - Failed to process: bad.jpg - Error: "));
}
