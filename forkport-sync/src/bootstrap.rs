//! Clone-or-open the upstream working copy, register fork remotes, fetch.
//!
//! Idempotent across runs: an existing clone is reused and existing remotes
//! are left alone. Any failure aborts the run; remotes are fetched in order
//! `origin`, organization fork, user fork, and a failed fetch stops the
//! remaining ones.

use std::path::Path;

use forkport_core::config::{SyncConfig, UPSTREAM_REMOTE};

use crate::error::{bootstrap_err, io_err, SyncError};
use crate::runner::{run_in_dir, Git};

/// Prepare the working copy for `user` and return a handle to it.
pub fn bootstrap(config: &SyncConfig, user: &str) -> Result<Git, SyncError> {
    let git = ensure_clone(&config.workdir, &config.upstream_url())?;

    ensure_remote(&git, &config.fork_org, &config.remote_url(&config.fork_org))?;
    ensure_remote(&git, user, &config.remote_url(user))?;

    let mut fetched: Vec<&str> = Vec::with_capacity(3);
    for remote in [UPSTREAM_REMOTE, config.fork_org.as_str(), user] {
        if fetched.contains(&remote) {
            continue;
        }
        fetch(&git, remote)?;
        fetched.push(remote);
    }

    let gitconfig = config.resolved_gitconfig_path()?;
    configure_identity(&git, user, &gitconfig)?;
    Ok(git)
}

/// Clone `url` into `dir`, or open `dir` if it already holds a repository.
pub fn ensure_clone(dir: &Path, url: &str) -> Result<Git, SyncError> {
    if dir.join(".git").exists() {
        tracing::info!("using existing clone at {}", dir.display());
        return Ok(Git::open(dir));
    }

    if dir.exists() {
        let mut entries = std::fs::read_dir(dir).map_err(|e| io_err(dir, e))?;
        if entries.next().is_some() {
            return Err(SyncError::Bootstrap(format!(
                "{} exists, is not empty, and is not a git repository",
                dir.display()
            )));
        }
    } else {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }

    tracing::info!("cloning {url} into {}", dir.display());
    run_in_dir(dir, "git", &["clone", "--quiet", url, "."])
        .map_err(|e| bootstrap_err("unable to clone upstream", e))?;
    Ok(Git::open(dir))
}

/// Add remote `name` unless it already exists.
pub fn ensure_remote(git: &Git, name: &str, url: &str) -> Result<(), SyncError> {
    let remotes = git
        .run(&["remote"])
        .map_err(|e| bootstrap_err("unable to list remotes", e))?;
    if remotes.lines().any(|r| r.trim() == name) {
        tracing::debug!("remote {name} already registered");
        return Ok(());
    }
    git.run(&["remote", "add", name, url])
        .map_err(|e| bootstrap_err(&format!("unable to add {name} remote"), e))?;
    tracing::info!("added remote {name} -> {url}");
    Ok(())
}

/// Fetch branches and tags from `remote`. Being up to date is not an error.
pub fn fetch(git: &Git, remote: &str) -> Result<(), SyncError> {
    tracing::info!("fetching branches and tags from {remote}");
    git.run(&["fetch", "--quiet", "--tags", "--force", remote])
        .map_err(|e| bootstrap_err(&format!("unable to fetch {remote} remote"), e))?;
    Ok(())
}

/// Set the working copy's commit identity; the email comes from `gitconfig`.
pub fn configure_identity(git: &Git, user: &str, gitconfig: &Path) -> Result<(), SyncError> {
    git.run(&["config", "user.name", user])
        .map_err(|e| bootstrap_err("unable to set user.name", e))?;

    let gitconfig = gitconfig.to_string_lossy();
    let email = git
        .run(&["config", "-f", &gitconfig, "--get", "user.email"])
        .map_err(|e| bootstrap_err(&format!("no user.email in {gitconfig}"), e))?;
    let email = email.trim();
    if email.is_empty() {
        return Err(SyncError::Bootstrap(format!("empty user.email in {gitconfig}")));
    }

    git.run(&["config", "user.email", email])
        .map_err(|e| bootstrap_err("unable to set user.email", e))?;
    tracing::debug!("commit identity set to {user} <{email}>");
    Ok(())
}
