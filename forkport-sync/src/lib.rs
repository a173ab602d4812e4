//! # forkport-sync
//!
//! Fork-synchronization engine: bootstrap the upstream clone, resolve the
//! hardened branch, then rebase or cherry-pick the patch series onto a new
//! upstream tag, remediating known conflicts along the way.
//!
//! Call [`pipeline::run`] for a full run or [`pipeline::push`] to publish.

pub mod bootstrap;
pub mod cherry_pick;
pub mod error;
pub mod pipeline;
pub mod push;
pub mod rebase;
pub mod remediation;
pub mod resolve;
pub mod runner;
pub mod tags;

pub use error::SyncError;
pub use pipeline::{PushTarget, RebaseRequest, SyncOutcome, SyncPath};
pub use remediation::Remediation;
pub use resolve::Resolution;
pub use runner::{CommandError, CommandOutput, Git};
