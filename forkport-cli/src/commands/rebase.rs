//! `forkport rebase` — synchronize the hardened branch with an upstream tag.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use forkport_core::SyncConfig;
use forkport_sync::{pipeline, RebaseRequest, SyncOutcome, SyncPath};

/// Arguments for `forkport rebase`.
#[derive(Args, Debug)]
pub struct RebaseArgs {
    /// Upstream tag to rebase onto. Defaults to the newest tag matching the
    /// configured filter (e.g. `controller`).
    #[arg(long)]
    pub tag: Option<String>,

    /// Previous hardened branch to rebase from, overriding the computed one.
    #[arg(long)]
    pub previous: Option<String>,

    /// GitHub username; also the name of the user's fork remote.
    #[arg(long, short = 'u', env = "USER")]
    pub user: String,

    /// Emit the run outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

impl RebaseArgs {
    pub fn run(self, config: &SyncConfig) -> Result<()> {
        let request = RebaseRequest {
            user: self.user,
            tag: self.tag,
            previous: self.previous,
        };
        let outcome = pipeline::run(config, &request).with_context(|| match &request.tag {
            Some(tag) => format!("unable to synchronize hardened branch with {tag}"),
            None => "unable to synchronize hardened branch with the latest tag".to_owned(),
        })?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&outcome).context("failed to render outcome JSON")?
            );
        } else {
            print_outcome(&outcome);
        }
        Ok(())
    }
}

fn print_outcome(outcome: &SyncOutcome) {
    let (verb, next) = match &outcome.path {
        SyncPath::Rebased => ("rebased onto".to_owned(), "push-user"),
        SyncPath::CherryPicked { from } => (format!("cherry-picked from {from} onto"), "push-rancher"),
    };
    println!(
        "{} {} {verb} {}",
        "✓".green().bold(),
        outcome.branch.to_string().bold(),
        outcome.tag
    );
    for r in &outcome.remediations {
        println!(
            "  {}  #{} {} ({} {})",
            "⚑".yellow(),
            r.index,
            r.message,
            r.action,
            r.files.join(", ")
        );
    }
    println!("  HEAD {}", outcome.head);
    println!("  next: forkport {next}");
}
