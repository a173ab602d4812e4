//! Domain types for the hardening patch series.
//!
//! The series is static configuration: it describes how to repair specific,
//! known conflicts, not what the repository currently contains.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A downstream branch name such as `hardened-nginx-1.9.x-fix`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HardenedBranch(pub String);

impl HardenedBranch {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HardenedBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for HardenedBranch {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for HardenedBranch {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// File-level remediation applied when a patch's known conflict occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PatchAction {
    #[default]
    None,
    /// Stage the listed files.
    Add,
    /// Delete the listed files from the index and working tree.
    Remove,
}

impl fmt::Display for PatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchAction::None => write!(f, "none"),
            PatchAction::Add => write!(f, "add"),
            PatchAction::Remove => write!(f, "remove"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// One commit of the hardening series and the repair for its known conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchEntry {
    /// Substring of the commit message identifying the patch.
    pub message: String,
    #[serde(default)]
    pub action: PatchAction,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl PatchEntry {
    pub fn new(message: &str, action: PatchAction, files: &[&str]) -> Self {
        Self {
            message: message.to_owned(),
            action,
            files: files.iter().map(|f| (*f).to_owned()).collect(),
        }
    }

    /// An entry with no remediation; it only counts toward the series length.
    pub fn plain(message: &str) -> Self {
        Self::new(message, PatchAction::None, &[])
    }

    /// True when `text` names this patch.
    pub fn matches(&self, text: &str) -> bool {
        !self.message.is_empty() && text.contains(&self.message)
    }
}

/// The ordered hardening series, oldest patch first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchSeries(Vec<PatchEntry>);

impl PatchSeries {
    pub fn new(entries: Vec<PatchEntry>) -> Self {
        Self(entries)
    }

    /// The series maintained on top of ingress-nginx.
    pub fn builtin() -> Self {
        Self(vec![
            PatchEntry::new(
                "Adding drone and build artifacts",
                PatchAction::Remove,
                &[".github/workflows/ci.yaml", ".github/workflows/depreview.yaml"],
            ),
            PatchEntry::new(
                "Skip or Fix Flaky Unint and E2E Tests",
                PatchAction::Add,
                &["test/e2e/settings/opentelemetry.go"],
            ),
            PatchEntry::new(
                "Hardened Nginx and S390x changes",
                PatchAction::Remove,
                &["images/nginx/rootfs/Dockerfile"],
            ),
            PatchEntry::new("Use BCI base image", PatchAction::Add, &["Dockerfile.dapper"]),
            PatchEntry::new(
                "add arm64 support",
                PatchAction::Remove,
                &["cmd/plugin/commands/ingresses/ingresses_test.go"],
            ),
            PatchEntry::plain("Disable s390x Drone pipeline"),
            PatchEntry::plain("Downgrade nginx to 1.21.4 for pcre compatability"),
            PatchEntry::plain("Drop back to older brotli version"),
            PatchEntry::plain("Rancher go.work.sum changes"),
            PatchEntry::plain("Rancher go.work.sum changes"),
        ])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[PatchEntry] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatchEntry> {
        self.0.iter()
    }

    /// First entry (in series order) whose message occurs in `text`.
    pub fn find(&self, text: &str) -> Option<(usize, &PatchEntry)> {
        self.0.iter().enumerate().find(|(_, e)| e.matches(text))
    }
}

impl Default for PatchSeries {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a PatchSeries {
    type Item = &'a PatchEntry;
    type IntoIter = std::slice::Iter<'a, PatchEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
