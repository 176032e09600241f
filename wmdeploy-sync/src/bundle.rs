//! Flat YAML bundles, one per script, for import through the web UI.
//!
//! ```yaml
//! summary: Upsert lead
//! description: ''
//! language: python3
//! content: |
//!   def main(...):
//! ```
//!
//! Unlike `deploy`, scripts without a sidecar are bundled too, with default
//! metadata. An unreadable or malformed sidecar also falls back to defaults
//! for that script only.
//!
//! ## Write protocol
//!
//! 1. Serialize the bundle.
//! 2. Write to `<path>.wmdeploy.tmp`.
//! 3. Rename to final path (atomic on POSIX); remove the tmp on failure.

use std::path::{Path, PathBuf};

use serde::Serialize;

use wmdeploy_core::{metadata::default_metadata, DeployConfig, Metadata};

use crate::discovery::scan_sources;
use crate::error::{io_err, SyncError};

#[derive(Debug, Serialize)]
struct Bundle<'a> {
    summary: &'a str,
    description: &'a str,
    language: &'a str,
    content: &'a str,
}

/// One bundle written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleResult {
    pub source_path: PathBuf,
    pub bundle_path: PathBuf,
}

/// Write `<out_dir>/<stem>.yaml` for every source file under the configured
/// folders. Creates `out_dir` if needed.
pub fn write_bundles(config: &DeployConfig, out_dir: &Path) -> Result<Vec<BundleResult>, SyncError> {
    std::fs::create_dir_all(out_dir).map_err(|e| io_err(out_dir, e))?;

    let mut results = Vec::new();
    for file in scan_sources(config)? {
        let metadata: Metadata = match &file.metadata_path {
            Some(path) => match wmdeploy_core::load_metadata(path, &file.source_path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!("{e}; bundling with default metadata");
                    default_metadata(&file.source_path)
                }
            },
            None => default_metadata(&file.source_path),
        };
        let content =
            std::fs::read_to_string(&file.source_path).map_err(|e| io_err(&file.source_path, e))?;

        let yaml = serde_yaml::to_string(&Bundle {
            summary: &metadata.summary,
            description: &metadata.description,
            language: &config.language,
            content: &content,
        })?;

        let stem = file
            .source_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bundle_path = out_dir.join(format!("{stem}.yaml"));
        atomic_write(&bundle_path, &yaml)?;
        tracing::info!("wrote bundle: {}", bundle_path.display());

        results.push(BundleResult {
            source_path: file.source_path,
            bundle_path,
        });
    }
    Ok(results)
}

fn atomic_write(path: &Path, content: &str) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}.wmdeploy.tmp", path.display()));
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
