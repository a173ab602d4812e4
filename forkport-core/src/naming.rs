//! Hardened branch names derived from upstream tags.
//!
//! ```text
//! controller-v1.9.3  ==>  hardened-nginx-1.9.x-fix   (current)
//!                    ==>  hardened-nginx-1.8.x-fix   (previous)
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::error::NamingError;
use crate::types::HardenedBranch;

fn version_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"v(\d+)\.(\d+)\.\d+").expect("static version regex"))
}

/// The major/minor components of an upstream tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    pub raw: String,
    pub major: String,
    pub minor: String,
}

impl VersionTag {
    /// Extract `v<major>.<minor>.<patch>` from anywhere in `tag`.
    pub fn parse(tag: &str) -> Result<Self, NamingError> {
        let caps = version_re()
            .captures(tag)
            .ok_or_else(|| NamingError::MalformedTag {
                tag: tag.to_owned(),
            })?;
        Ok(Self {
            raw: tag.to_owned(),
            major: caps[1].to_owned(),
            minor: caps[2].to_owned(),
        })
    }

    fn minor_number(&self) -> Result<u32, NamingError> {
        self.minor
            .parse::<u32>()
            .map_err(|_| NamingError::NonNumericMinor {
                tag: self.raw.clone(),
                minor: self.minor.clone(),
            })
    }
}

fn branch(product: &str, major: &str, minor: impl std::fmt::Display) -> HardenedBranch {
    HardenedBranch(format!("hardened-{product}-{major}.{minor}.x-fix"))
}

/// `hardened-<product>-<major>.<minor>.x-fix` for the tag's own minor line.
pub fn derive_branch_name(product: &str, tag: &str) -> Result<HardenedBranch, NamingError> {
    let v = VersionTag::parse(tag)?;
    Ok(branch(product, &v.major, &v.minor))
}

/// Same as [`derive_branch_name`] with the minor version decremented.
///
/// Minor `0` is rejected with [`NamingError::NoPreviousMinor`]; the previous
/// major's last minor line cannot be derived from the tag alone.
pub fn derive_previous_branch_name(
    product: &str,
    tag: &str,
) -> Result<HardenedBranch, NamingError> {
    let v = VersionTag::parse(tag)?;
    let minor = v.minor_number()?;
    let previous = minor
        .checked_sub(1)
        .ok_or_else(|| NamingError::NoPreviousMinor { tag: v.raw.clone() })?;
    Ok(branch(product, &v.major, previous))
}
