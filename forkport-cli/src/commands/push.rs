//! `forkport push-user` / `forkport push-rancher` — publish the hardened branch.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use forkport_core::SyncConfig;
use forkport_sync::{pipeline, PushTarget};

/// Arguments for `forkport push-user`.
#[derive(Args, Debug)]
pub struct PushUserArgs {
    /// GitHub username; the fork remote pushed to.
    #[arg(long, short = 'u', env = "USER")]
    pub user: String,

    /// GitHub token with repo and workflow access.
    #[arg(long, short = 't', env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,
}

impl PushUserArgs {
    pub fn run(self, config: &SyncConfig) -> Result<()> {
        let target = PushTarget::User(self.user.clone());
        push(config, &target, &self.token, &self.user)
    }
}

/// Arguments for `forkport push-rancher`.
#[derive(Args, Debug)]
pub struct PushRancherArgs {
    /// GitHub token with repo and workflow access.
    #[arg(long, short = 't', env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: String,
}

impl PushRancherArgs {
    pub fn run(self, config: &SyncConfig) -> Result<()> {
        push(config, &PushTarget::Organization, &self.token, &config.fork_org)
    }
}

fn push(config: &SyncConfig, target: &PushTarget, token: &str, remote: &str) -> Result<()> {
    let branch = pipeline::push(config, target, token)
        .with_context(|| format!("failed to push hardened branch to {remote}"))?;
    println!("{} pushed {} to {remote}", "✓".green().bold(), branch.bold());
    Ok(())
}
