//! Cherry-pick engine: replay the series commit by commit onto a new branch.
//!
//! Entry `i` of an `N`-entry series is `<source>~(N-1-i)`, so the oldest
//! patch is picked first.

use forkport_core::types::PatchSeries;

use crate::error::SyncError;
use crate::remediation::{self, ConflictContext, Remediation};
use crate::runner::Git;

/// `git checkout -b <branch> <tag>`.
pub fn create_branch_from_tag(git: &Git, branch: &str, tag: &str) -> Result<(), SyncError> {
    tracing::info!("creating branch {branch} from tag {tag}");
    git.run(&["checkout", "--quiet", "-b", branch, tag])?;
    Ok(())
}

/// Revisions to pick from `source`, oldest patch first.
pub fn pick_revisions(series: &PatchSeries, source: &str) -> Vec<String> {
    let n = series.len();
    (0..n).map(|i| format!("{source}~{}", n - 1 - i)).collect()
}

/// Cherry-pick every patch of `series` from `source` onto HEAD.
pub fn cherry_pick_series(
    git: &Git,
    series: &PatchSeries,
    source: &str,
) -> Result<Vec<Remediation>, SyncError> {
    let revs = pick_revisions(series, source);
    if let Some(oldest) = revs.first() {
        if !git.rev_exists(oldest) {
            return Err(SyncError::InsufficientHistory {
                rev: oldest.clone(),
                needed: series.len(),
            });
        }
    }

    let mut remediations = Vec::new();
    for rev in &revs {
        let err = match git.run(&["cherry-pick", "-Xtheirs", rev]) {
            Ok(_) => {
                tracing::debug!("picked {rev}");
                continue;
            }
            Err(err) => err,
        };

        let ctx = ConflictContext::capture(git, "CHERRY_PICK_HEAD", Some(rev), err);
        let Some((idx, entry)) = ctx.lookup(series) else {
            return Err(ctx.into_conflict());
        };
        remediation::apply(git, entry)?;
        git.run(&["cherry-pick", "--continue"])
            .map_err(|e| SyncError::Conflict {
                message: format!("unable to cherry-pick {rev}: {e}"),
            })?;
        tracing::info!("picked {rev} after remediating '{}'", entry.message);
        remediations.push(Remediation::new(idx, entry, ctx.commit));
    }

    tracing::info!("cherry-picked {} hardened commits from {source}", revs.len());
    Ok(remediations)
}
