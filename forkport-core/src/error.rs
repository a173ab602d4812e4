//! Error types for forkport-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while deriving hardened branch names from an upstream tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    /// The tag does not contain a `v<major>.<minor>.<patch>` version.
    #[error("malformed tag '{tag}': expected a version like v<major>.<minor>.<patch>")]
    MalformedTag { tag: String },

    /// The minor component could not be parsed as an integer.
    #[error("minor version '{minor}' of tag '{tag}' is not a valid integer")]
    NonNumericMinor { tag: String, minor: String },

    /// Minor version 0 has no previous hardened branch within the same major.
    #[error("tag '{tag}' has minor version 0; no previous hardened branch exists, pass --previous explicitly")]
    NoPreviousMinor { tag: String },
}

/// All errors that can arise from loading or validating a [`crate::SyncConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config parsed but describes an unusable setup.
    #[error("invalid config: {0}")]
    Invalid(String),

    /// `dirs::home_dir()` returned `None` and no gitconfig path was configured.
    #[error("cannot determine home directory; set $HOME or configure gitconfig_path")]
    HomeNotFound,
}
