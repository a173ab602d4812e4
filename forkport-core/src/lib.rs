//! forkport core library — patch series, branch naming, configuration, errors.
//!
//! Public API surface:
//! - [`types`] — patch entries, the ordered series, branch/tag newtypes
//! - [`naming`] — hardened branch names derived from upstream tags
//! - [`config`] — [`SyncConfig`] loading and validation
//! - [`error`] — [`NamingError`] and [`ConfigError`]

pub mod config;
pub mod error;
pub mod naming;
pub mod types;

pub use config::SyncConfig;
pub use error::{ConfigError, NamingError};
pub use naming::{derive_branch_name, derive_previous_branch_name, VersionTag};
pub use types::{HardenedBranch, PatchAction, PatchEntry, PatchSeries};
