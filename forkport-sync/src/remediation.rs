//! Known-conflict lookup and the file actions that repair them.
//!
//! A stopped rebase or cherry-pick is identified by the commit git was
//! applying (`REBASE_HEAD` / `CHERRY_PICK_HEAD`). Its subject line is looked
//! up in the patch series; the commit body is never consulted. The tool's
//! error text is only searched when the commit metadata is unavailable.

use serde::Serialize;

use forkport_core::types::{PatchAction, PatchEntry, PatchSeries};

use crate::error::SyncError;
use crate::runner::{CommandError, Git};

/// What git was doing when it stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictContext {
    /// Commit being applied, when git exposes it.
    pub commit: Option<String>,
    /// That commit's subject line.
    pub subject: Option<String>,
    /// The failing command's error, unaltered.
    pub error: CommandError,
}

impl ConflictContext {
    /// Inspect the working copy after `error`. `pseudo_ref` is `REBASE_HEAD`
    /// or `CHERRY_PICK_HEAD`; `fallback_rev` is the revision the caller asked
    /// git to apply, if known.
    pub fn capture(git: &Git, pseudo_ref: &str, fallback_rev: Option<&str>, error: CommandError) -> Self {
        let rev = if git.rev_exists(pseudo_ref) {
            Some(pseudo_ref)
        } else {
            fallback_rev.filter(|r| git.rev_exists(r))
        };
        let commit = rev.and_then(|r| git.rev_parse(r).ok());
        let subject = rev.and_then(|r| git.commit_subject(r));
        Self {
            commit,
            subject,
            error,
        }
    }

    /// First series entry naming this conflict.
    pub fn lookup<'a>(&self, series: &'a PatchSeries) -> Option<(usize, &'a PatchEntry)> {
        match &self.subject {
            Some(subject) => series.find(subject),
            None => series.find(&self.error.stderr),
        }
    }

    /// The error surfaced when no remediation applies.
    pub fn into_conflict(self) -> SyncError {
        SyncError::Conflict {
            message: self.error.to_string(),
        }
    }
}

/// A remediation that was applied during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remediation {
    /// Position of the matched entry in the series.
    pub index: usize,
    pub message: String,
    pub action: PatchAction,
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}

impl Remediation {
    pub fn new(index: usize, entry: &PatchEntry, commit: Option<String>) -> Self {
        Self {
            index,
            message: entry.message.clone(),
            action: entry.action,
            files: entry.files.clone(),
            commit,
        }
    }
}

/// Apply `entry`'s file action to the in-progress operation.
pub fn apply(git: &Git, entry: &PatchEntry) -> Result<(), SyncError> {
    tracing::info!(
        "remediating '{}': {} {}",
        entry.message,
        entry.action,
        entry.files.join(", ")
    );
    match entry.action {
        PatchAction::None => Ok(()),
        PatchAction::Add => add_files(git, entry),
        PatchAction::Remove => remove_files(git, entry),
    }
}

fn is_tracked(git: &Git, file: &str) -> bool {
    git.succeeds(&["ls-files", "--error-unmatch", "--", file])
}

fn failure(entry: &PatchEntry, file: &str, message: impl Into<String>) -> SyncError {
    SyncError::RemediationFailure {
        patch: entry.message.clone(),
        file: file.to_owned(),
        message: message.into(),
    }
}

/// Remove each file from the index and working tree. Already-absent files are skipped.
fn remove_files(git: &Git, entry: &PatchEntry) -> Result<(), SyncError> {
    for file in &entry.files {
        let on_disk = git.dir().join(file);
        if is_tracked(git, file) {
            git.run(&["rm", "-f", "--quiet", "--", file])
                .map_err(|e| failure(entry, file, e.to_string()))?;
        } else if on_disk.exists() {
            std::fs::remove_file(&on_disk).map_err(|e| failure(entry, file, e.to_string()))?;
        } else {
            tracing::warn!("{file} already absent, nothing to remove");
        }
    }
    Ok(())
}

/// Stage each file. A file missing from disk but already in the index is skipped.
fn add_files(git: &Git, entry: &PatchEntry) -> Result<(), SyncError> {
    for file in &entry.files {
        if git.dir().join(file).exists() {
            git.run(&["add", "--", file])
                .map_err(|e| failure(entry, file, e.to_string()))?;
        } else if is_tracked(git, file) {
            tracing::warn!("{file} already staged, nothing to add");
        } else {
            return Err(failure(entry, file, "file not found in working tree or index"));
        }
    }
    Ok(())
}
