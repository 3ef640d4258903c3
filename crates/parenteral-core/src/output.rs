//! Export of records and the verification report.
//!
//! Every artifact is serialized in memory, written to a temporary file inside
//! the output directory, and renamed into place, so readers never observe a
//! partially written file.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::{ExportError, ExportResult};
use crate::report::VerificationReport;
use crate::types::{MetadataRecord, COLUMN_COUNT};

/// Spreadsheet sheet name.
pub const SHEET_NAME: &str = "Metadata";

/// Width applied to every spreadsheet column.
const COLUMN_WIDTH: f64 = 15.0;

/// Header fill colour (#D9E1F2).
const HEADER_FILL: u32 = 0xD9E1F2;

/// Data export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Comma-separated values with a header row
    Csv,
    /// Spreadsheet with a styled header row
    Xlsx,
    /// JSON array of records
    Json,
}

impl ExportFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "excel" => Some(Self::Xlsx),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Paths written by one export.
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    /// Data files, in configured format order; empty when there were no records
    pub data_files: Vec<PathBuf>,

    /// The verification report
    pub report_file: PathBuf,
}

/// Writes run artifacts into the output directory.
pub struct Exporter {
    dir: PathBuf,
    file_stem: String,
    formats: Vec<ExportFormat>,
    report_file: String,
}

impl Exporter {
    /// Create an exporter writing into `dir` with names from `output`.
    pub fn new(dir: PathBuf, output: &OutputConfig) -> Self {
        let mut formats: Vec<ExportFormat> = Vec::with_capacity(output.formats.len());
        for format in &output.formats {
            if !formats.contains(format) {
                formats.push(*format);
            }
        }
        Self {
            dir,
            file_stem: output.file_stem.clone(),
            formats,
            report_file: output.report_file.clone(),
        }
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if it does not exist.
    pub fn prepare(&self) -> ExportResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|source| ExportError::OutputDir {
            path: self.dir.clone(),
            source,
        })
    }

    /// Path of the data file for `format`.
    pub fn data_path(&self, format: ExportFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.file_stem, format.extension()))
    }

    /// Path of the verification report.
    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.report_file)
    }

    /// Write every configured data format plus the report.
    ///
    /// With no records, data files are skipped (existing ones are left
    /// untouched) and only the report is written.
    pub fn export(
        &self,
        records: &[MetadataRecord],
        report: &VerificationReport,
    ) -> ExportResult<ExportSummary> {
        self.prepare()?;

        let mut summary = ExportSummary::default();

        if records.is_empty() {
            tracing::warn!("No records to export; skipping data files");
        } else {
            for &format in &self.formats {
                let bytes = match format {
                    ExportFormat::Csv => render_csv(records)?,
                    ExportFormat::Xlsx => render_xlsx(records)?,
                    ExportFormat::Json => render_json(records)?,
                };
                let path = self.data_path(format);
                write_atomic(&self.dir, &path, &bytes)?;
                tracing::info!("Wrote {} record(s) to {:?}", records.len(), path);
                summary.data_files.push(path);
            }
        }

        let report_path = self.report_path();
        write_atomic(&self.dir, &report_path, report.render().as_bytes())?;
        tracing::info!("Wrote verification report to {:?}", report_path);
        summary.report_file = report_path;

        Ok(summary)
    }
}

/// Serialize records as CSV with a header row into `writer`.
pub fn write_csv<W: Write>(records: &[MetadataRecord], writer: W) -> ExportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

fn render_csv(records: &[MetadataRecord]) -> ExportResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(buffer)
}

fn render_json(records: &[MetadataRecord]) -> ExportResult<Vec<u8>> {
    let mut buffer = serde_json::to_vec_pretty(records)?;
    buffer.push(b'\n');
    Ok(buffer)
}

/// A spreadsheet cell value.
enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

/// Cells of one record, in [`MetadataRecord::COLUMNS`] order.
fn record_cells(record: &MetadataRecord) -> [Cell<'_>; COLUMN_COUNT] {
    [
        Cell::Text(&record.category),
        Cell::Text(&record.file_name),
        Cell::Text(&record.relative_path),
        Cell::Text(&record.medication_name),
        Cell::Text(&record.generic_name),
        Cell::Text(&record.concentration),
        Cell::Text(&record.volume_ml),
        Cell::Text(&record.manufacturer),
        Cell::Text(&record.ndc_code),
        Cell::Text(&record.lot_number),
        Cell::Text(&record.expiration_date),
        Cell::Text(&record.storage_requirements),
        Cell::Number(f64::from(record.image_width)),
        Cell::Number(f64::from(record.image_height)),
        Cell::Text(&record.image_format),
        Cell::Number(record.file_size_kb),
        Cell::Text(&record.date_added),
        Cell::Text(&record.last_modified),
        Cell::Text(&record.processing_status),
        Cell::Text(&record.notes),
    ]
}

/// Build the spreadsheet: one `Metadata` sheet, styled header, fixed widths.
fn render_xlsx(records: &[MetadataRecord]) -> ExportResult<Vec<u8>> {
    let header_format = Format::new()
        .set_bold()
        .set_text_wrap()
        .set_align(FormatAlign::Top)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Thin);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in MetadataRecord::COLUMNS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *name, &header_format)?;
        sheet.set_column_width(col, COLUMN_WIDTH)?;
    }

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, cell) in record_cells(record).into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text("") => {}
                Cell::Text(text) => {
                    sheet.write_string(row, col, text)?;
                }
                Cell::Number(value) => {
                    sheet.write_number(row, col, value)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write `bytes` to `path` via a temporary file in `dir` and a rename.
fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> ExportResult<()> {
    let write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    temp.write_all(bytes).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
