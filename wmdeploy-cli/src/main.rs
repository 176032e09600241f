//! wmdeploy: push local scripts and their sidecar metadata to a workspace.
//!
//! # Usage
//!
//! ```text
//! wmdeploy deploy [--dry-run] [--json]
//! wmdeploy list [--json]
//! wmdeploy bundle --out <dir>
//!
//! Shared options (flag > WM_* env > config file > default):
//!   --token <WM_TOKEN>  --base-url <WM_BASE_URL>  --workspace <WM_WORKSPACE>
//!   --root <WM_SCRIPTS_ROOT>  --namespace-root <WM_NAMESPACE_ROOT>
//!   --config <path>  --timeout <secs>  -v/--verbose
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{bundle::BundleArgs, deploy::DeployArgs, list::ListArgs, SettingsArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "wmdeploy",
    version,
    about = "Deploy local scripts to a remote workspace",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Log progress to stderr (same as RUST_LOG=info).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create or update every paired script in the remote workspace.
    Deploy(DeployArgs),

    /// Show discovered scripts and the remote paths they map to.
    List(ListArgs),

    /// Write one YAML bundle per script instead of uploading.
    Bundle(BundleArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Deploy(args) => args.run(&cli.settings),
        Commands::List(args) => args.run(&cli.settings),
        Commands::Bundle(args) => args.run(&cli.settings),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
