//! Branch resolution: pick the rebase path or the cherry-pick path.
//!
//! ```text
//! NoTargetBranch ─┬─ <user>/<current> exists ─▶ CheckedOut      (rebase)
//!                 └─ missing ─▶ checkout <user>/<fallback> ─▶ NeedsCreation (cherry-pick)
//!                                       └─ missing ─▶ BranchNotFound
//! ```

use serde::Serialize;

use forkport_core::config::SyncConfig;
use forkport_core::naming::{derive_branch_name, derive_previous_branch_name};
use forkport_core::types::HardenedBranch;

use crate::error::SyncError;
use crate::runner::Git;

/// Terminal state of branch resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Resolution {
    /// The target branch exists on the user remote and is checked out.
    CheckedOut { branch: HardenedBranch },
    /// The target branch must be created; `fallback` is checked out and
    /// holds the patch series to replay.
    NeedsCreation {
        branch: HardenedBranch,
        fallback: HardenedBranch,
    },
}

/// Reset the working copy to a deterministic state and detach HEAD.
///
/// Aborts any rebase or cherry-pick a previous run left behind.
pub fn clean(git: &Git) -> Result<(), SyncError> {
    if git.rebase_in_progress() {
        tracing::warn!("aborting rebase left over from a previous run");
        git.run(&["rebase", "--abort"])?;
    }
    if git.cherry_pick_in_progress() {
        tracing::warn!("aborting cherry-pick left over from a previous run");
        git.run(&["cherry-pick", "--abort"])?;
    }
    git.run(&["clean", "-xfd", "--quiet"])?;
    git.run(&["checkout", "--quiet", "."])?;
    git.run(&["checkout", "--quiet", "--detach"])?;
    Ok(())
}

/// Delete local branch `name` if present. HEAD must not be on it.
pub fn remove_local_branch(git: &Git, name: &str) -> Result<(), SyncError> {
    let refname = format!("refs/heads/{name}");
    if git.ref_exists(&refname) {
        tracing::debug!("removing stale local branch {name}");
        git.run(&["update-ref", "-d", &refname])?;
    }
    Ok(())
}

/// Equivalent of `git checkout --track <remote>/<branch>`, replacing any
/// stale local branch of the same name.
pub fn checkout_remote_branch(git: &Git, remote: &str, branch: &str) -> Result<(), SyncError> {
    let remote_ref = format!("{remote}/{branch}");
    if !git.ref_exists(&format!("refs/remotes/{remote_ref}")) {
        return Err(SyncError::BranchNotFound {
            remote: remote.to_owned(),
            branch: branch.to_owned(),
        });
    }
    tracing::info!("checking out remote branch {remote_ref}");
    remove_local_branch(git, branch)?;
    git.run(&["checkout", "--quiet", "--track", &remote_ref])?;
    Ok(())
}

/// Decide how `tag` will be synchronized and check out the branch to work on.
///
/// `previous` overrides the computed fallback branch name.
pub fn resolve_branch(
    git: &Git,
    config: &SyncConfig,
    user: &str,
    tag: &str,
    previous: Option<&str>,
) -> Result<Resolution, SyncError> {
    let branch = derive_branch_name(&config.product, tag)?;

    clean(git)?;
    remove_local_branch(git, branch.as_str())?;

    match checkout_remote_branch(git, user, branch.as_str()) {
        Ok(()) => {
            tracing::info!("switching to branch: {branch}");
            return Ok(Resolution::CheckedOut { branch });
        }
        Err(SyncError::BranchNotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    let fallback = match previous {
        Some(p) => HardenedBranch::from(p),
        None => derive_previous_branch_name(&config.product, tag)?,
    };
    tracing::info!("{user}/{branch} not found, falling back to {user}/{fallback}");
    checkout_remote_branch(git, user, fallback.as_str())?;
    Ok(Resolution::NeedsCreation { branch, fallback })
}
