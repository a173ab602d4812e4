//! Latest upstream release tag lookup.

use chrono::{DateTime, FixedOffset};

use crate::error::SyncError;
use crate::runner::Git;

const TAG_FORMAT: &str =
    "--format=%(refname:short)%09%(committerdate:iso-strict)%09%(*committerdate:iso-strict)";

/// A tag and the committer date of the commit it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    pub name: String,
    pub date: DateTime<FixedOffset>,
}

/// Parse one `for-each-ref` line. Annotated tags carry the date in the
/// dereferenced column, lightweight tags in the direct one.
fn parse_line(line: &str) -> Option<TagInfo> {
    let mut cols = line.split('\t');
    let name = cols.next()?.trim();
    let direct = cols.next().unwrap_or("").trim();
    let peeled = cols.next().unwrap_or("").trim();
    let raw = if peeled.is_empty() { direct } else { peeled };
    let date = DateTime::parse_from_rfc3339(raw).ok()?;
    Some(TagInfo {
        name: name.to_owned(),
        date,
    })
}

/// Newest tag containing `filter`; the first listed wins a tie.
pub fn pick_latest<'a>(lines: impl IntoIterator<Item = &'a str>, filter: &str) -> Option<TagInfo> {
    lines
        .into_iter()
        .filter_map(parse_line)
        .filter(|t| t.name.contains(filter))
        .fold(None, |best: Option<TagInfo>, t| match best {
            Some(b) if t.date <= b.date => Some(b),
            _ => Some(t),
        })
}

/// Most recent tag in the working copy whose name contains `filter`.
pub fn latest_tag(git: &Git, filter: &str) -> Result<String, SyncError> {
    let out = git.run(&["for-each-ref", TAG_FORMAT, "refs/tags"])?;
    let latest = pick_latest(out.lines(), filter).ok_or_else(|| SyncError::TagNotFound {
        filter: filter.to_owned(),
    })?;
    tracing::info!("found latest {filter} tag: {}", latest.name);
    Ok(latest.name)
}
