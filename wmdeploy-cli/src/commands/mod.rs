pub mod bundle;
pub mod deploy;
pub mod list;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use wmdeploy_core::{config, ConfigError, ConfigOverrides, DeployConfig};

/// Connection and layout options shared by every subcommand.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Bearer token for the scripts API.
    #[arg(long, global = true, env = "WM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// API base URL [default: http://localhost:8000/api].
    #[arg(long, global = true, env = "WM_BASE_URL")]
    pub base_url: Option<String>,

    /// Workspace identifier [default: admins].
    #[arg(long, global = true, env = "WM_WORKSPACE")]
    pub workspace: Option<String>,

    /// Directory holding the script folders [default: f/einstein_kids].
    #[arg(long = "root", global = true, env = "WM_SCRIPTS_ROOT", value_name = "DIR")]
    pub scripts_root: Option<PathBuf>,

    /// Directory remote paths are relative to [default: f].
    #[arg(long, global = true, env = "WM_NAMESPACE_ROOT", value_name = "DIR")]
    pub namespace_root: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long = "timeout", global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// YAML config file [default: <config dir>/wmdeploy/config.yaml if present].
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl SettingsArgs {
    /// Merge flags, environment, config file and defaults.
    pub fn resolve(&self) -> Result<DeployConfig> {
        let file = match &self.config {
            Some(path) => config::load_file_at(path)?,
            None => config::load_default_file()?,
        };
        let cwd = std::env::current_dir()
            .map_err(ConfigError::CurrentDir)
            .context("failed to resolve configuration")?;
        let overrides = ConfigOverrides {
            token: self.token.clone(),
            base_url: self.base_url.clone(),
            workspace: self.workspace.clone(),
            scripts_root: self.scripts_root.clone(),
            namespace_root: self.namespace_root.clone(),
            timeout_secs: self.timeout_secs,
        };
        Ok(DeployConfig::resolve(file, overrides, &cwd))
    }
}
