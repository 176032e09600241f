//! wmdeploy core library: domain types, configuration, errors, and the pure
//! per-script stages of the deployment pipeline.
//!
//! - [`types`] - newtypes and domain structs
//! - [`error`] - [`ScriptError`], [`ConfigError`]
//! - [`config`] - layered [`DeployConfig`]
//! - [`normalize`] - local path → [`RemotePath`]
//! - [`metadata`] - sidecar loading with defaults
//! - [`payload`] - [`UploadPayload`] construction

pub mod config;
pub mod error;
pub mod metadata;
pub mod normalize;
pub mod payload;
pub mod types;

pub use config::{ConfigFile, ConfigOverrides, DeployConfig};
pub use error::{ConfigError, ScriptError};
pub use metadata::load_metadata;
pub use normalize::normalize_script_path;
pub use payload::build_payload;
pub use types::{Metadata, Outcome, RemotePath, ScriptItem, UploadPayload, SCRIPT_KIND};
