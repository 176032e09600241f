//! `wmdeploy list`: discovered scripts and their remote paths.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use wmdeploy_sync::{plan, PlannedScript};

use super::SettingsArgs;

/// Arguments for `wmdeploy list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ListEntryJson {
    source: String,
    metadata: String,
    remote_path: Option<String>,
    error: Option<String>,
}

#[derive(Tabled)]
struct ListTableRow {
    #[tabled(rename = "source")]
    source: String,
    #[tabled(rename = "remote path")]
    remote_path: String,
}

impl ListArgs {
    pub fn run(self, settings: &SettingsArgs) -> Result<()> {
        let config = settings.resolve()?;
        let planned = plan(&config).with_context(|| {
            format!("failed to scan {}", config.scripts_root.display())
        })?;

        if self.json {
            let entries: Vec<ListEntryJson> = planned.iter().map(to_json).collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&entries).context("failed to serialize list JSON")?
            );
            return Ok(());
        }

        if planned.is_empty() {
            println!(
                "No deployable scripts under {}.",
                config.scripts_root.display()
            );
            return Ok(());
        }

        let rows: Vec<ListTableRow> = planned
            .iter()
            .map(|p| ListTableRow {
                source: p
                    .item
                    .source_path
                    .strip_prefix(&config.scripts_root)
                    .unwrap_or(&p.item.source_path)
                    .display()
                    .to_string(),
                remote_path: match &p.remote_path {
                    Ok(path) => path.to_string(),
                    Err(e) => format!("error: {e}"),
                },
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        println!("{} script(s) in workspace '{}'", planned.len(), config.workspace);
        Ok(())
    }
}

fn to_json(planned: &PlannedScript) -> ListEntryJson {
    let (remote_path, error) = match &planned.remote_path {
        Ok(path) => (Some(path.to_string()), None),
        Err(e) => (None, Some(e.to_string())),
    };
    ListEntryJson {
        source: planned.item.source_path.display().to_string(),
        metadata: planned.item.metadata_path.display().to_string(),
        remote_path,
        error,
    }
}
