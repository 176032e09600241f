//! Error types for wmdeploy-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while preparing a single script for upload.
///
/// Every variant is item-scoped: the driver records it as that script's
/// failure and moves on to the next one.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The source file does not live under the namespace root.
    #[error("script path outside {root}: {path}")]
    OutOfScope { path: PathBuf, root: PathBuf },

    /// The sidecar document was not found. Discovery only yields paired
    /// files, so seeing this means a caller skipped discovery.
    #[error("metadata not found at {path}")]
    MissingMetadata { path: PathBuf },

    /// The sidecar exists but is not a valid metadata document: broken YAML,
    /// a non-mapping top level, or a recognized key of the wrong type.
    #[error("failed to parse metadata at {path}: {source}")]
    MetadataParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Reading the source or metadata file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while assembling the run configuration.
///
/// All of these are preconditions: the run aborts before any script is
/// processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No bearer token was supplied by flag, environment or config file.
    #[error("missing WM_TOKEN; export WM_TOKEN or pass --token before deploying")]
    MissingCredential,

    /// The config file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`crate::config::ConfigFile`].
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The current directory is needed to resolve a relative root.
    #[error("cannot determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ScriptError {
    ScriptError::Io {
        path: path.into(),
        source,
    }
}
