//! `wmdeploy deploy`: create or update every paired script.

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use wmdeploy_core::Outcome;
use wmdeploy_sync::{deploy, DeployOptions, DeployReport, UreqTransport};

use super::SettingsArgs;

/// Arguments for `wmdeploy deploy`.
#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Build every payload and report what would be sent, without sending.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

impl DeployArgs {
    pub fn run(self, settings: &SettingsArgs) -> Result<()> {
        let config = settings.resolve()?;
        let transport = UreqTransport::from_config(&config);
        let report = deploy(
            &config,
            transport,
            DeployOptions {
                dry_run: self.dry_run,
            },
        )
        .context("deploy aborted before any script was uploaded")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("failed to serialize report JSON")?
            );
        } else {
            print_report(&report);
        }

        if !report.is_success() {
            print_failures(&report);
            bail!(
                "{} of {} script(s) failed",
                report.failures().len(),
                report.items.len()
            );
        }
        Ok(())
    }
}

fn print_report(report: &DeployReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };

    if report.items.is_empty() {
        println!("{prefix}✓ '{}' — nothing to deploy", report.workspace);
        return;
    }

    let verb = if report.dry_run { "planned" } else { "deployed" };
    println!(
        "{prefix}✓ '{}' {verb} ({} created, {} updated, {} skipped, {} failed)",
        report.workspace,
        report.created(),
        report.updated(),
        report.skipped(),
        report.failures().len(),
    );

    for item in &report.items {
        let target = item
            .remote_path
            .as_ref()
            .map(|p| p.to_string())
            .unwrap_or_else(|| item.source_path.display().to_string());
        match &item.outcome {
            Outcome::Created => println!("  {}  {target}", "+".green()),
            Outcome::Updated => println!("  {}  {target}", "↻".cyan()),
            Outcome::Skipped => println!("  {}  {target}", "~".bright_black()),
            Outcome::Failed(_) => println!("  {}  {target}", "✗".red()),
        }
    }
}

fn print_failures(report: &DeployReport) {
    let failures = report.failures();
    eprintln!("{} {} script(s) failed:", "✗".red().bold(), failures.len());
    for item in failures {
        if let Outcome::Failed(reason) = &item.outcome {
            eprintln!("  {}: {reason}", item.source_path.display());
        }
    }
}
