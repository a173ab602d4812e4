//! forkport — forward-port the hardening patch series onto upstream releases.
//!
//! # Usage
//!
//! ```text
//! forkport rebase [--tag <tag>] [--previous <branch>] [--user <name>] [--json]
//! forkport push-user [--user <name>] [--token <token>]
//! forkport push-rancher [--token <token>]
//! ```
//!
//! Global flags: `--config <file>` (YAML, see `forkport_core::config`) and
//! `--debug`.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    push::{PushRancherArgs, PushUserArgs},
    rebase::RebaseArgs,
};
use forkport_core::SyncConfig;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "forkport",
    version,
    about = "Forward-port hardened patches onto new upstream releases",
    long_about = None,
)]
struct Cli {
    /// YAML config overriding remotes, working directory, and the patch series.
    #[arg(long, short = 'c', global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG).
    #[arg(long, short = 'd', global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebase or cherry-pick the hardened commits onto a new upstream release.
    Rebase(RebaseArgs),

    /// Force-push the hardened branch to the user's fork for a PR.
    PushUser(PushUserArgs),

    /// Push a new hardened branch to the organization fork.
    PushRancher(PushRancherArgs),
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = SyncConfig::load_or_default(cli.config.as_deref()).with_context(|| match &cli.config {
        Some(p) => format!("failed to load config from {}", p.display()),
        None => "invalid built-in configuration".to_owned(),
    })?;

    match cli.command {
        Commands::Rebase(args) => args.run(&config),
        Commands::PushUser(args) => args.run(&config),
        Commands::PushRancher(args) => args.run(&config),
    }
}
