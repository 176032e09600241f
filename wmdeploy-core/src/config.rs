//! Run configuration.
//!
//! Values are layered, highest precedence first:
//!
//! ```text
//! command-line flags / WM_* environment   (ConfigOverrides)
//! YAML config file                        (ConfigFile)
//! built-in defaults
//! ```
//!
//! The resolved [`DeployConfig`] is built once at process start and passed by
//! reference into every pipeline stage.
//!
//! # API pattern
//!
//! - `load_file_at(path)` - explicit path; used in tests with `TempDir`
//! - `load_default_file()` - `<config_dir>/wmdeploy/config.yaml` via `dirs`

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_WORKSPACE: &str = "admins";
pub const DEFAULT_SCRIPTS_ROOT: &str = "f/einstein_kids";
pub const DEFAULT_NAMESPACE_ROOT: &str = "f";
pub const DEFAULT_NAMESPACE: &str = "u";
pub const DEFAULT_OWNER: &str = "admin";
pub const DEFAULT_LANGUAGE: &str = "python3";
pub const DEFAULT_SOURCE_EXTENSION: &str = "py";
pub const DEFAULT_METADATA_SUFFIX: &str = ".script.yaml";
pub const DEFAULT_FOLDERS: [&str; 3] = ["shared", "moms", "therapists"];

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

/// On-disk config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub workspace: Option<String>,
    pub scripts_root: Option<PathBuf>,
    pub namespace_root: Option<PathBuf>,
    pub folders: Option<Vec<String>>,
    pub namespace: Option<String>,
    pub owner: Option<String>,
    pub language: Option<String>,
    pub source_extension: Option<String>,
    pub metadata_suffix: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Values supplied on the command line or through `WM_*` variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub workspace: Option<String>,
    pub scripts_root: Option<PathBuf>,
    pub namespace_root: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// Bearer token. Only required when requests are actually sent.
    pub token: Option<String>,
    /// API base, without trailing slash.
    pub base_url: String,
    pub workspace: String,
    /// Directory whose `folders` are scanned for scripts. Absolute.
    pub scripts_root: PathBuf,
    /// Directory remote paths are computed relative to. Absolute.
    pub namespace_root: PathBuf,
    pub folders: Vec<String>,
    pub namespace: String,
    pub owner: String,
    pub language: String,
    /// Source file extension without the dot.
    pub source_extension: String,
    /// Replaces `.<source_extension>` to form the sidecar file name.
    pub metadata_suffix: String,
    pub timeout_secs: Option<u64>,
}

impl DeployConfig {
    /// Merge the layers. Relative roots are joined onto `cwd`.
    pub fn resolve(file: ConfigFile, overrides: ConfigOverrides, cwd: &Path) -> Self {
        let token = overrides
            .token
            .or(file.token)
            .filter(|t| !t.trim().is_empty());
        let base_url = overrides
            .base_url
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let scripts_root = overrides
            .scripts_root
            .or(file.scripts_root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRIPTS_ROOT));
        let namespace_root = overrides
            .namespace_root
            .or(file.namespace_root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NAMESPACE_ROOT));

        Self {
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            workspace: overrides
                .workspace
                .or(file.workspace)
                .unwrap_or_else(|| DEFAULT_WORKSPACE.to_string()),
            scripts_root: absolutize(cwd, scripts_root),
            namespace_root: absolutize(cwd, namespace_root),
            folders: file
                .folders
                .unwrap_or_else(|| DEFAULT_FOLDERS.iter().map(|f| f.to_string()).collect()),
            namespace: file.namespace.unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            owner: file.owner.unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            language: file.language.unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            source_extension: file
                .source_extension
                .map(|ext| ext.trim_start_matches('.').to_string())
                .unwrap_or_else(|| DEFAULT_SOURCE_EXTENSION.to_string()),
            metadata_suffix: file
                .metadata_suffix
                .unwrap_or_else(|| DEFAULT_METADATA_SUFFIX.to_string()),
            timeout_secs: overrides.timeout_secs.or(file.timeout_secs),
        }
    }

    /// Defaults only, roots resolved against `cwd`.
    pub fn defaults_at(cwd: &Path) -> Self {
        Self::resolve(ConfigFile::default(), ConfigOverrides::default(), cwd)
    }

    /// The bearer token, or [`ConfigError::MissingCredential`].
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.token.as_deref().ok_or(ConfigError::MissingCredential)
    }

    /// `<namespace>/<owner>`, the prefix of every remote path.
    pub fn remote_prefix(&self) -> String {
        format!("{}/{}", self.namespace, self.owner)
    }
}

fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

// ---------------------------------------------------------------------------
// Config file loading
// ---------------------------------------------------------------------------

/// `<config_dir>/wmdeploy/config.yaml`, if a config dir exists on this platform.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wmdeploy").join("config.yaml"))
}

/// Load the config file at `path`.
///
/// An empty file yields [`ConfigFile::default`].
pub fn load_file_at(path: &Path) -> Result<ConfigFile, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the default config file; a missing file is not an error.
pub fn load_default_file() -> Result<ConfigFile, ConfigError> {
    match default_config_path() {
        Some(path) if path.exists() => load_file_at(&path),
        _ => Ok(ConfigFile::default()),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
