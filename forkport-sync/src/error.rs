//! Error types for forkport-sync.

use std::path::PathBuf;

use thiserror::Error;

use forkport_core::error::{ConfigError, NamingError};

use crate::runner::CommandError;

/// All errors that can arise while synchronizing the hardened fork.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Clone, remote registration, fetch, or identity setup failed.
    #[error("bootstrap failed: {0}")]
    Bootstrap(String),

    /// The upstream tag could not be turned into a branch name.
    #[error(transparent)]
    Naming(#[from] NamingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Neither the target branch nor the fallback exists on the user remote.
    #[error("unable to find {remote}/{branch} on any usable remote")]
    BranchNotFound { remote: String, branch: String },

    /// The branch has fewer commits than the patch series needs.
    #[error("{rev} does not resolve to a commit: history holds fewer than {needed} hardening commits")]
    InsufficientHistory { rev: String, needed: usize },

    /// A rebase or cherry-pick stopped on a conflict with no known remediation.
    /// `message` is the git error text, unaltered.
    #[error("{message}")]
    Conflict { message: String },

    /// A known remediation's own file action failed.
    #[error("remediation for '{patch}' failed on {file}: {message}")]
    RemediationFailure {
        patch: String,
        file: String,
        message: String,
    },

    /// Any other git invocation failure.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// No tag in the repository matches the configured filter.
    #[error("no tag matching '{filter}' found")]
    TagNotFound { filter: String },

    /// The tag requested with `--tag` does not exist after fetching.
    #[error("tag '{tag}' not found in any fetched remote")]
    TagMissing { tag: String },

    #[error("push to {remote} failed: {message}")]
    Push { remote: String, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}

/// Wrap a failed git call as a [`SyncError::Bootstrap`] with `what` as context.
pub(crate) fn bootstrap_err(what: &str, err: impl std::fmt::Display) -> SyncError {
    SyncError::Bootstrap(format!("{what}: {err}"))
}
