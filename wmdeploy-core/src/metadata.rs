//! Sidecar metadata loading.
//!
//! A sidecar is a YAML mapping next to the script:
//!
//! ```yaml
//! summary: "Upsert lead"
//! description: "Creates or updates a lead row"
//! schema:
//!   type: object
//!   properties: {}
//! ```
//!
//! Unknown keys are ignored. Absent, null, or empty `summary` falls back to
//! the *source* file name; `description` falls back to `""`; `schema` to `{}`.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{io_err, ScriptError};
use crate::types::Metadata;

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    schema: Option<Value>,
}

/// Load the sidecar at `metadata_path` for the script at `source_path`.
pub fn load_metadata(metadata_path: &Path, source_path: &Path) -> Result<Metadata, ScriptError> {
    if !metadata_path.exists() {
        return Err(ScriptError::MissingMetadata {
            path: metadata_path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(metadata_path).map_err(|e| io_err(metadata_path, e))?;
    parse_metadata(&contents, metadata_path, source_path)
}

/// Parse sidecar text. `metadata_path` is only used for error context.
pub fn parse_metadata(
    contents: &str,
    metadata_path: &Path,
    source_path: &Path,
) -> Result<Metadata, ScriptError> {
    let parse_err = |source: serde_yaml::Error| ScriptError::MetadataParse {
        path: metadata_path.to_path_buf(),
        source,
    };

    let raw = if contents.trim().is_empty() {
        RawMetadata::default()
    } else {
        match serde_yaml::from_str::<serde_yaml::Value>(contents).map_err(parse_err)? {
            serde_yaml::Value::Null => RawMetadata::default(),
            value => serde_yaml::from_value(value).map_err(parse_err)?,
        }
    };

    Ok(with_defaults(raw, source_path))
}

/// Metadata for a script that has no sidecar at all.
pub fn default_metadata(source_path: &Path) -> Metadata {
    with_defaults(RawMetadata::default(), source_path)
}

fn with_defaults(raw: RawMetadata, source_path: &Path) -> Metadata {
    let summary = raw
        .summary
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| base_name(source_path));
    let schema = match raw.schema {
        None | Some(Value::Null) => Value::Object(Map::new()),
        Some(schema) => schema,
    };
    Metadata {
        summary,
        description: raw.description.unwrap_or_default(),
        schema,
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
