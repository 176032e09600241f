//! Error types for wmdeploy-sync.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use wmdeploy_core::{ConfigError, RemotePath, ScriptError};

/// Which request of the upsert protocol produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Create,
    Update,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Create => write!(f, "create"),
            Stage::Update => write!(f, "update"),
        }
    }
}

/// All errors that can arise from discovery, upload, and bundling.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Preparing the script failed (path, metadata, or source read).
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Run configuration is unusable; raised before any script is touched.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The request never produced an HTTP response.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a status the protocol treats as terminal.
    #[error("{stage} failed {path}: {status} {body}")]
    Rejected {
        path: RemotePath,
        stage: Stage,
        status: u16,
        body: String,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (bundle export).
    #[error("bundle YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
