//! Shared run entrypoints used by the CLI.
//!
//! ```text
//! bootstrap ─▶ tag ─▶ resolve ─┬─ CheckedOut    ─▶ rebase_onto
//!                              └─ NeedsCreation ─▶ create branch ─▶ cherry_pick_series
//! ```

use serde::Serialize;

use forkport_core::config::SyncConfig;
use forkport_core::types::HardenedBranch;

use crate::bootstrap::bootstrap;
use crate::cherry_pick::{cherry_pick_series, create_branch_from_tag};
use crate::error::SyncError;
use crate::rebase::rebase_onto;
use crate::remediation::Remediation;
use crate::resolve::{resolve_branch, Resolution};
use crate::runner::Git;
use crate::{push, tags};

/// Inputs of `forkport rebase`, already resolved from flags and environment.
#[derive(Debug, Clone, Default)]
pub struct RebaseRequest {
    /// Fork owner; also the name of the user remote.
    pub user: String,
    /// Upstream tag; the latest tag matching `tag_filter` when `None`.
    pub tag: Option<String>,
    /// Overrides the computed fallback branch.
    pub previous: Option<String>,
}

/// Which terminal path a run took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncPath {
    Rebased,
    CherryPicked { from: HardenedBranch },
}

/// Result of a successful run. The branch is left checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub tag: String,
    pub branch: HardenedBranch,
    pub path: SyncPath,
    pub head: String,
    pub remediations: Vec<Remediation>,
}

/// Bootstrap the working copy, then synchronize the hardened branch.
pub fn run(config: &SyncConfig, request: &RebaseRequest) -> Result<SyncOutcome, SyncError> {
    let git = bootstrap(config, &request.user)?;
    synchronize(&git, config, request)
}

/// Synchronize an already bootstrapped working copy.
pub fn synchronize(
    git: &Git,
    config: &SyncConfig,
    request: &RebaseRequest,
) -> Result<SyncOutcome, SyncError> {
    let tag = match &request.tag {
        Some(t) => t.clone(),
        None => tags::latest_tag(git, &config.tag_filter)?,
    };
    if !git.rev_exists(&tag) {
        return Err(SyncError::TagMissing { tag });
    }

    let resolution = resolve_branch(
        git,
        config,
        &request.user,
        &tag,
        request.previous.as_deref(),
    )?;

    let (branch, path, remediations) = match resolution {
        Resolution::CheckedOut { branch } => {
            let remediations = rebase_onto(git, &config.patches, &tag)?;
            tracing::info!(
                "successfully rebased {branch} onto {tag}; use `forkport push-user` to publish it"
            );
            (branch, SyncPath::Rebased, remediations)
        }
        Resolution::NeedsCreation { branch, fallback } => {
            tracing::info!("no remote branch {branch} found, creating new branch based off tag {tag}");
            create_branch_from_tag(git, branch.as_str(), &tag)?;
            let remediations = cherry_pick_series(git, &config.patches, fallback.as_str())?;
            tracing::info!(
                "successfully cherry-picked hardened commits onto {branch}; use `forkport push-rancher` to publish it"
            );
            (branch, SyncPath::CherryPicked { from: fallback }, remediations)
        }
    };

    Ok(SyncOutcome {
        head: git.rev_parse("HEAD")?,
        tag,
        branch,
        path,
        remediations,
    })
}

/// Where a push goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushTarget {
    /// The user's fork; force-pushed.
    User(String),
    /// The organization fork; never forced.
    Organization,
}

/// Push the checked-out hardened branch of the existing working copy.
pub fn push(config: &SyncConfig, target: &PushTarget, token: &str) -> Result<String, SyncError> {
    if !config.workdir.join(".git").exists() {
        return Err(SyncError::Bootstrap(format!(
            "no working copy at {}; run `forkport rebase` first",
            config.workdir.display()
        )));
    }
    let git = Git::open(&config.workdir);
    let (remote, force) = match target {
        PushTarget::User(user) => (user.as_str(), true),
        PushTarget::Organization => (config.fork_org.as_str(), false),
    };
    push::push_branch(&git, remote, token, force)
}
