//! File discovery for finding images under the scan root.

use std::path::Path;
use walkdir::WalkDir;

use crate::config::{ScanConfig, ScanMode};
use crate::types::{ImageCandidate, UNCATEGORIZED};

/// Discovers image files in a directory tree.
pub struct FileDiscovery {
    config: ScanConfig,
}

impl FileDiscovery {
    /// Create a new file discovery instance.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Discover all supported image files under `root`.
    ///
    /// Flat mode only looks at direct children; recursive mode walks every
    /// subdirectory and labels each file with its top-level directory.
    /// Entries that cannot be read are skipped. Results are ordered by
    /// file name at every directory level, so repeated scans of an
    /// unchanged tree yield the same sequence.
    pub fn discover(&self, root: &Path) -> Vec<ImageCandidate> {
        let max_depth = match self.config.mode {
            ScanMode::Flat => 1,
            ScanMode::Recursive => usize::MAX,
        };

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(self.config.follow_links)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry: {e}");
                    continue;
                }
            };

            let entry_path = entry.path();
            if !entry.file_type().is_file() || !self.is_supported(entry_path) {
                continue;
            }

            let Ok(relative_path) = entry_path.strip_prefix(root) else {
                continue;
            };

            let category = match self.config.mode {
                ScanMode::Flat => None,
                ScanMode::Recursive => Some(category_for(relative_path)),
            };

            files.push(ImageCandidate {
                path: entry_path.to_path_buf(),
                relative_path: relative_path.to_path_buf(),
                category,
            });
        }

        files
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

/// Category for a root-relative path: its first directory, or
/// [`UNCATEGORIZED`] for files directly under the root.
pub fn category_for(relative_path: &Path) -> String {
    let mut components = relative_path.components();
    let first = components.next();
    match (first, components.next()) {
        (Some(dir), Some(_)) => dir.as_os_str().to_string_lossy().into_owned(),
        _ => UNCATEGORIZED.to_string(),
    }
}
