//! Script discovery.
//!
//! ```text
//! <scripts_root>/
//!   shared/
//!     upsert_lead.py
//!     upsert_lead.script.yaml   ← sidecar: upsert_lead.py is deployable
//!     draft.py                  ← no sidecar: silently left out
//!   moms/
//!   therapists/                 ← may be absent (partial checkout)
//! ```
//!
//! Ordering is folder list order, then file name order, so repeated runs
//! visit scripts in the same sequence.

use std::path::{Path, PathBuf};

use wmdeploy_core::{DeployConfig, ScriptItem};

use crate::error::{io_err, SyncError};

/// A source file found during a scan, with its sidecar if one exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub source_path: PathBuf,
    pub metadata_path: Option<PathBuf>,
}

/// `upsert_lead.py` → `upsert_lead.script.yaml`, in the same directory.
pub fn sidecar_path(source: &Path, source_extension: &str, metadata_suffix: &str) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dotted = format!(".{source_extension}");
    let stem = name.strip_suffix(&dotted).unwrap_or(&name);
    source.with_file_name(format!("{stem}{metadata_suffix}"))
}

/// Every source file under the configured folders, paired or not.
pub fn scan_sources(config: &DeployConfig) -> Result<Vec<SourceFile>, SyncError> {
    let dotted = format!(".{}", config.source_extension);
    let mut found = Vec::new();

    for folder in &config.folders {
        let dir = config.scripts_root.join(folder);
        if !dir.is_dir() {
            tracing::debug!("folder not present, skipping: {}", dir.display());
            continue;
        }

        let mut entries: Vec<_> = std::fs::read_dir(&dir)
            .map_err(|e| io_err(&dir, e))?
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!("unreadable entry in {}, skipping: {e}", dir.display());
                    None
                }
            })
            .filter(|e| {
                let name = e.file_name();
                let Some(name) = name.to_str() else {
                    tracing::debug!("non-UTF-8 file name, skipping: {}", e.path().display());
                    return false;
                };
                name.len() > dotted.len() && name.ends_with(&dotted) && e.path().is_file()
            })
            .collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let source_path = entry.path();
            let sidecar = sidecar_path(
                &source_path,
                &config.source_extension,
                &config.metadata_suffix,
            );
            found.push(SourceFile {
                metadata_path: sidecar.is_file().then_some(sidecar),
                source_path,
            });
        }
    }

    Ok(found)
}

/// Deployable scripts: source files that have a sidecar.
pub fn discover(config: &DeployConfig) -> Result<Vec<ScriptItem>, SyncError> {
    let items = scan_sources(config)?
        .into_iter()
        .filter_map(|file| match file.metadata_path {
            Some(metadata_path) => Some(ScriptItem {
                source_path: file.source_path,
                metadata_path,
            }),
            None => {
                tracing::debug!("no sidecar, not ready: {}", file.source_path.display());
                None
            }
        })
        .collect();
    Ok(items)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
