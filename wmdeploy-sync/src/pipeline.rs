//! Deployment driver: discovery → metadata → path → payload → upsert.
//!
//! Scripts are processed one at a time in discovery order. A failure in any
//! stage becomes that script's [`Outcome::Failed`] and the run moves on.
//! Only precondition failures (no token, unreadable script folder) abort the
//! run, and they do so before the first script is touched.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use wmdeploy_core::{
    build_payload, load_metadata, normalize_script_path, DeployConfig, Outcome, RemotePath,
    ScriptError, ScriptItem, UploadPayload,
};

use crate::client::{ScriptsClient, Transport, UpsertOutcome};
use crate::discovery::discover;
use crate::error::SyncError;

/// Options for a single deploy run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeployOptions {
    /// Build every payload but send nothing. No token needed.
    pub dry_run: bool,
}

/// Disposition of one discovered script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub source_path: PathBuf,
    /// `None` when the script failed before its path was derived.
    pub remote_path: Option<RemotePath>,
    pub outcome: Outcome,
}

/// Everything a run did, in processing order.
#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub workspace: String,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub items: Vec<ItemReport>,
}

impl DeployReport {
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Updated))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    pub fn failures(&self) -> Vec<&ItemReport> {
        self.items.iter().filter(|i| i.outcome.is_failed()).collect()
    }

    /// `true` when no script failed.
    pub fn is_success(&self) -> bool {
        !self.items.iter().any(|i| i.outcome.is_failed())
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.items.iter().filter(|i| pred(&i.outcome)).count()
    }
}

/// Run the deploy pipeline over every discovered script.
pub fn deploy<T: Transport>(
    config: &DeployConfig,
    transport: T,
    options: DeployOptions,
) -> Result<DeployReport, SyncError> {
    let started_at = Utc::now();

    let client = if options.dry_run {
        None
    } else {
        Some(ScriptsClient::from_config(config, transport)?)
    };
    let items = discover(config)?;
    tracing::info!(
        "deploying {} script(s) to workspace '{}'",
        items.len(),
        config.workspace
    );

    let mut reports = Vec::with_capacity(items.len());
    for item in &items {
        let report = process_item(config, client.as_ref(), item);
        match &report.outcome {
            Outcome::Failed(reason) => tracing::warn!("{reason}"),
            outcome => tracing::info!(
                "{outcome} {}",
                report
                    .remote_path
                    .as_ref()
                    .map(|p| p.to_string())
                    .unwrap_or_default()
            ),
        }
        reports.push(report);
    }

    Ok(DeployReport {
        workspace: config.workspace.clone(),
        dry_run: options.dry_run,
        started_at,
        finished_at: Utc::now(),
        items: reports,
    })
}

fn process_item<T: Transport>(
    config: &DeployConfig,
    client: Option<&ScriptsClient<T>>,
    item: &ScriptItem,
) -> ItemReport {
    let mut remote_path = None;
    let outcome = match upload_item(config, client, item, &mut remote_path) {
        Ok(outcome) => outcome,
        Err(e) => Outcome::Failed(e.to_string()),
    };
    ItemReport {
        source_path: item.source_path.clone(),
        remote_path,
        outcome,
    }
}

fn upload_item<T: Transport>(
    config: &DeployConfig,
    client: Option<&ScriptsClient<T>>,
    item: &ScriptItem,
    remote_path: &mut Option<RemotePath>,
) -> Result<Outcome, SyncError> {
    let payload = prepare_payload(config, item, remote_path)?;
    let Some(client) = client else {
        return Ok(Outcome::Skipped);
    };
    Ok(match client.upsert(&payload)? {
        UpsertOutcome::Created => Outcome::Created,
        UpsertOutcome::Updated => Outcome::Updated,
    })
}

/// Load, normalize, read and build, in that order. `remote_path` is filled
/// in as soon as it is known so failures after that point still report it.
pub fn prepare_payload(
    config: &DeployConfig,
    item: &ScriptItem,
    remote_path: &mut Option<RemotePath>,
) -> Result<UploadPayload, ScriptError> {
    let metadata = load_metadata(&item.metadata_path, &item.source_path)?;
    let path = normalize_script_path(
        &item.source_path,
        &config.namespace_root,
        &config.remote_prefix(),
    )?;
    *remote_path = Some(path.clone());
    let content = std::fs::read_to_string(&item.source_path).map_err(|source| ScriptError::Io {
        path: item.source_path.clone(),
        source,
    })?;
    Ok(build_payload(content, path, metadata, &config.language))
}

/// A discovered script and the remote path it would deploy to.
#[derive(Debug)]
pub struct PlannedScript {
    pub item: ScriptItem,
    pub remote_path: Result<RemotePath, ScriptError>,
}

/// Discovery plus normalization only: what `deploy` would touch.
pub fn plan(config: &DeployConfig) -> Result<Vec<PlannedScript>, SyncError> {
    let prefix = config.remote_prefix();
    Ok(discover(config)?
        .into_iter()
        .map(|item| {
            let remote_path =
                normalize_script_path(&item.source_path, &config.namespace_root, &prefix);
            PlannedScript { item, remote_path }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
