//! Rebase engine: replay the series onto a new upstream tag in one rebase.
//!
//! Used when the target hardened branch already carries the series. Each
//! stop is matched against the whole series, the same table the cherry-pick
//! engine uses. At most one remediation per series entry is attempted.

use forkport_core::types::PatchSeries;

use crate::error::SyncError;
use crate::remediation::{self, ConflictContext, Remediation};
use crate::runner::Git;

/// `git rebase --onto <tag> -Xtheirs HEAD~N`, remediating known conflicts.
pub fn rebase_onto(git: &Git, series: &PatchSeries, tag: &str) -> Result<Vec<Remediation>, SyncError> {
    let n = series.len();
    let base = format!("HEAD~{n}");
    if !git.rev_exists(&base) {
        return Err(SyncError::InsufficientHistory {
            rev: base,
            needed: n,
        });
    }

    tracing::info!("rebasing last {n} commits onto {tag}");
    let mut remediations: Vec<Remediation> = Vec::new();
    let mut last_stop: Option<String> = None;
    let mut step = git.run(&["rebase", "--onto", tag, "-Xtheirs", &base]);

    while let Err(err) = step {
        if !git.rebase_in_progress() {
            return Err(err.into());
        }
        let ctx = ConflictContext::capture(git, "REBASE_HEAD", None, err);
        if remediations.len() >= n || (ctx.commit.is_some() && ctx.commit == last_stop) {
            return Err(ctx.into_conflict());
        }
        let Some((idx, entry)) = ctx.lookup(series) else {
            return Err(ctx.into_conflict());
        };

        remediation::apply(git, entry)?;
        remediations.push(Remediation::new(idx, entry, ctx.commit.clone()));
        last_stop = ctx.commit;
        step = git.run(&["rebase", "--continue"]);
    }

    tracing::info!("rebase onto {tag} complete ({} remediations)", remediations.len());
    Ok(remediations)
}
