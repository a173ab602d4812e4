//! Run configuration.
//!
//! A [`SyncConfig`] is built once at process start, either from defaults or
//! from a YAML file, and passed by reference to every engine step. Missing
//! keys fall back to the defaults below.
//!
//! ```yaml
//! product: nginx
//! upstream_org: kubernetes
//! fork_org: rancher
//! url_template: https://github.com/{org}/ingress-nginx
//! workdir: ingress-nginx
//! tag_filter: controller
//! patches:
//!   - message: Adding drone and build artifacts
//!     action: remove
//!     files: [.github/workflows/ci.yaml]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{PatchAction, PatchSeries};

/// Placeholder substituted with an organization or user name in `url_template`.
pub const ORG_PLACEHOLDER: &str = "{org}";

/// Name of the upstream remote created by `git clone`.
pub const UPSTREAM_REMOTE: &str = "origin";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Product segment of branch names: `hardened-<product>-X.Y.x-fix`.
    pub product: String,
    /// Organization owning the upstream repository.
    pub upstream_org: String,
    /// Organization fork; also the name of its remote.
    pub fork_org: String,
    /// Repository URL with an `{org}` placeholder.
    pub url_template: String,
    /// Working copy location.
    pub workdir: PathBuf,
    /// Substring selecting release tags when no tag is given.
    pub tag_filter: String,
    /// Global git config consulted for `user.email`. `None` means `~/.gitconfig`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gitconfig_path: Option<PathBuf>,
    pub patches: PatchSeries,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            product: "nginx".to_owned(),
            upstream_org: "kubernetes".to_owned(),
            fork_org: "rancher".to_owned(),
            url_template: format!("https://github.com/{ORG_PLACEHOLDER}/ingress-nginx"),
            workdir: PathBuf::from("ingress-nginx"),
            tag_filter: "controller".to_owned(),
            gitconfig_path: None,
            patches: PatchSeries::builtin(),
        }
    }
}

impl SyncConfig {
    /// Load and validate a config file.
    pub fn load_at(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// `load_at` when a path is given, validated defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load_at(p),
            None => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.product.trim().is_empty() {
            return Err(ConfigError::Invalid("product must not be empty".into()));
        }
        if !self.url_template.contains(ORG_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "url_template '{}' must contain {ORG_PLACEHOLDER}",
                self.url_template
            )));
        }
        if self.patches.is_empty() {
            return Err(ConfigError::Invalid("patch series must not be empty".into()));
        }
        for (idx, entry) in self.patches.iter().enumerate() {
            if entry.message.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "patch #{idx} has an empty message"
                )));
            }
            if entry.action != PatchAction::None && entry.files.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "patch #{idx} ('{}') has action {} but lists no files",
                    entry.message, entry.action
                )));
            }
        }
        Ok(())
    }

    /// Repository URL for `org`.
    pub fn remote_url(&self, org: &str) -> String {
        self.url_template.replacen(ORG_PLACEHOLDER, org, 1)
    }

    pub fn upstream_url(&self) -> String {
        self.remote_url(&self.upstream_org)
    }

    /// Configured gitconfig path, or `~/.gitconfig`.
    pub fn resolved_gitconfig_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.gitconfig_path {
            Some(p) => Ok(p.clone()),
            None => dirs::home_dir()
                .map(|h| h.join(".gitconfig"))
                .ok_or(ConfigError::HomeNotFound),
        }
    }
}
