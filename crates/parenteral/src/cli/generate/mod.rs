//! The `parenteral generate` command.

mod batch;
mod setup;
pub mod types;

pub use types::FormatArg;

use clap::Args;
use parenteral_core::{Exporter, MetadataError, MetadataPipeline, ProcessingLog};
use std::path::{Path, PathBuf};

use batch::{print_summary, process_batch};
use setup::build_config;
pub use setup::expand_path;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory containing the product images
    #[arg(default_value = "./Parenterals")]
    pub input: PathBuf,

    /// Directory receiving metadata, report, and log [default: metadata]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Descend into subdirectories and record the top-level folder as category
    #[arg(short, long, conflicts_with = "flat")]
    pub recursive: bool,

    /// Only scan files directly inside the input directory
    #[arg(long)]
    pub flat: bool,

    /// Accepted file extensions (repeatable or comma-separated) [default: jpg,jpeg]
    #[arg(short, long = "ext", value_delimiter = ',')]
    pub extensions: Vec<String>,

    /// Data export formats (repeatable or comma-separated) [default: csv]
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub format: Vec<FormatArg>,

    /// Fully decode every image instead of checking headers only
    #[arg(long)]
    pub strict: bool,

    /// Reject files larger than this many megabytes
    #[arg(long)]
    pub max_file_size_mb: Option<u64>,

    /// Leave the category column empty
    #[arg(long)]
    pub no_category: bool,

    /// Leave the concentration column empty
    #[arg(long)]
    pub no_concentration: bool,
}

/// Manual Default impl for constructing GenerateArgs outside of clap.
///
/// Values match the clap annotations above.
impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("./Parenterals"),
            output_dir: None,
            recursive: false,
            flat: false,
            extensions: Vec::new(),
            format: Vec::new(),
            strict: false,
            max_file_size_mb: None,
            no_category: false,
            no_concentration: false,
        }
    }
}

/// Execute the generate command.
pub fn execute(args: GenerateArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = build_config(&args, config_path)?;
    let root = expand_path(&args.input);
    let pipeline = MetadataPipeline::new(&config);

    let candidates = match pipeline.discover(&root) {
        Ok(candidates) => candidates,
        Err(MetadataError::InputNotFound(path)) => anyhow::bail!(
            "Input directory does not exist: {:?}\n\n  Hint: Pass the image folder as the first argument.",
            path
        ),
        Err(e) => return Err(e.into()),
    };

    let exporter = Exporter::new(config.output_dir(), &config.output);
    exporter.prepare()?;
    let mut log = ProcessingLog::open(&exporter.dir().join(&config.output.log_file))?;

    if candidates.is_empty() {
        tracing::warn!("No image files found in {:?}", root);
    } else {
        tracing::info!("Found {} image(s) to verify", candidates.len());
    }

    let run = process_batch(&pipeline, candidates, &mut log);
    let summary = exporter.export(&run.records, &run.report)?;
    log.flush();

    print_summary(&run.report, &summary, log.path());
    Ok(())
}
