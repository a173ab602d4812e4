//! Publish the checked-out hardened branch to a fork.

use crate::error::SyncError;
use crate::runner::Git;

const TOKEN_USER: &str = "x-access-token";

/// Environment variable the credential helper reads the token from.
pub const TOKEN_ENV: &str = "FORKPORT_PUSH_TOKEN";

/// Inline helper answering git's credential requests from [`TOKEN_ENV`].
/// The token itself never appears on a command line.
pub fn credential_helper() -> String {
    format!("!f() {{ echo username={TOKEN_USER}; echo \"password=${TOKEN_ENV}\"; }}; f")
}

/// Arguments for `git push`. With a token, configured credential helpers are
/// replaced by [`credential_helper`].
pub fn push_args(remote: &str, branch: &str, force: bool, with_token: bool) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    if with_token {
        args.push("-c".to_owned());
        args.push("credential.helper=".to_owned());
        args.push("-c".to_owned());
        args.push(format!("credential.helper={}", credential_helper()));
    }
    args.push("push".to_owned());
    args.push("--quiet".to_owned());
    if force {
        args.push("--force".to_owned());
    }
    args.push(remote.to_owned());
    args.push(format!("HEAD:refs/heads/{branch}"));
    args
}

/// Browser URL of `branch` on a GitHub-style remote.
pub fn tree_url(remote_url: &str, branch: &str) -> String {
    format!("{}/tree/{branch}", remote_url.trim_end_matches(".git"))
}

fn redact(text: &str, token: &str) -> String {
    if token.is_empty() {
        text.to_owned()
    } else {
        text.replace(token, "***")
    }
}

/// Push HEAD to `refs/heads/<current branch>` on `remote`. Returns the branch.
pub fn push_branch(git: &Git, remote: &str, token: &str, force: bool) -> Result<String, SyncError> {
    let branch = git.current_branch().ok_or_else(|| SyncError::Push {
        remote: remote.to_owned(),
        message: "HEAD is detached; run `forkport rebase` first".to_owned(),
    })?;
    let url = git
        .run(&["remote", "get-url", remote])
        .map_err(|e| SyncError::Push {
            remote: remote.to_owned(),
            message: e.to_string(),
        })?;
    let url = url.trim();

    let args = push_args(remote, &branch, force, !token.is_empty());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let env = [("GIT_TERMINAL_PROMPT", "0"), (TOKEN_ENV, token)];
    git.output_with_env(&args, &env).map_err(|e| SyncError::Push {
        remote: remote.to_owned(),
        message: redact(&e.stderr, token),
    })?;
    tracing::info!("new branch pushed to {}", tree_url(url, &branch));
    Ok(branch)
}
