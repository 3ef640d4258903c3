//! Run setup: config loading and CLI overrides.

use parenteral_core::config::{ScanMode, VerifyMode};
use parenteral_core::{Config, ExportFormat};
use std::path::{Path, PathBuf};

use super::GenerateArgs;

/// Load configuration and apply the command-line overrides in `args`.
pub fn build_config(args: &GenerateArgs, config_path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = crate::cli::load_config(config_path)?;
    apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &GenerateArgs) {
    if args.recursive {
        config.scan.mode = ScanMode::Recursive;
    }
    if args.flat {
        config.scan.mode = ScanMode::Flat;
    }
    if !args.extensions.is_empty() {
        config.scan.extensions = args
            .extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect();
    }
    if args.strict {
        config.verify.mode = VerifyMode::Decode;
    }
    if let Some(max_mb) = args.max_file_size_mb {
        config.limits.max_file_size_mb = max_mb;
    }
    if args.no_category {
        config.record.extract_category = false;
    }
    if args.no_concentration {
        config.record.extract_concentration = false;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.clone();
    }
    if !args.format.is_empty() {
        config.output.formats = args.format.iter().map(|&f| ExportFormat::from(f)).collect();
    }
}

/// Expand `~` in a user-supplied path.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
