//! Domain types for the deployment pipeline.
//!
//! All path fields use `PathBuf`; remote paths are always [`RemotePath`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed `kind` tag sent with every upload.
pub const SCRIPT_KIND: &str = "script";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Canonical remote path of a script, e.g. `u/admin/shared/upsert_lead`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemotePath(pub String);

impl RemotePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for RemotePath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RemotePath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Pipeline values
// ---------------------------------------------------------------------------

/// A source file paired with its sidecar metadata document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptItem {
    pub source_path: PathBuf,
    pub metadata_path: PathBuf,
}

/// Descriptive fields read from a sidecar, defaults already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub summary: String,
    pub description: String,
    pub schema: Value,
}

/// Request body for both the create and the update endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadPayload {
    pub path: RemotePath,
    pub content: String,
    pub language: String,
    pub summary: String,
    pub description: String,
    pub schema: Value,
    pub kind: &'static str,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Final disposition of one script in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "lowercase")]
pub enum Outcome {
    /// The create request succeeded.
    Created,
    /// The script already existed and the update request succeeded.
    Updated,
    /// Nothing was sent (dry run).
    Skipped,
    /// Some stage failed; the string is the rendered error chain.
    Failed(String),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => write!(f, "created"),
            Outcome::Updated => write!(f, "updated"),
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
