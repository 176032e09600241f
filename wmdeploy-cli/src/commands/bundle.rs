//! `wmdeploy bundle --out <dir>`: export YAML bundles.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use wmdeploy_sync::write_bundles;

use super::SettingsArgs;

/// Arguments for `wmdeploy bundle`.
#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Output directory; created if missing.
    #[arg(long, short = 'o', default_value = "scripts_yaml")]
    pub out: PathBuf,
}

impl BundleArgs {
    pub fn run(self, settings: &SettingsArgs) -> Result<()> {
        let config = settings.resolve()?;
        let results = write_bundles(&config, &self.out)
            .with_context(|| format!("bundle export to {} failed", self.out.display()))?;

        if results.is_empty() {
            println!("No scripts under {}.", config.scripts_root.display());
            return Ok(());
        }
        for r in &results {
            println!("  ✎  {}", r.bundle_path.display());
        }
        println!("✓ {} bundle(s) written", results.len());
        Ok(())
    }
}
