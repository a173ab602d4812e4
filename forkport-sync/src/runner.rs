//! Blocking command runner and the git working-copy handle built on it.
//!
//! Every call captures stdout and stderr separately. Failures carry the
//! captured stderr verbatim; remediation and branch lookup depend on it.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// Captured result of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub code: Option<i32>,
}

/// A command that could not be spawned or exited non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to run {command}: {stderr}")]
pub struct CommandError {
    /// Rendered command line, e.g. `git cherry-pick -Xtheirs main~2`.
    pub command: String,
    /// Exit code; `None` when the process never ran or was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

fn render(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn execute(mut cmd: Command, rendered: String) -> Result<CommandOutput, CommandError> {
    let output = cmd.output().map_err(|e| CommandError {
        command: rendered.clone(),
        code: None,
        stdout: String::new(),
        stderr: e.to_string(),
    })?;

    let out = CommandOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        code: output.status.code(),
    };
    if output.status.success() {
        Ok(out)
    } else {
        Err(CommandError {
            command: rendered,
            code: out.code,
            stdout: out.stdout,
            stderr: out.stderr,
        })
    }
}

/// Run `program args…` in `dir` and wait for it.
pub fn run_in_dir(dir: &Path, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir);
    execute(cmd, render(program, args))
}

// ---------------------------------------------------------------------------
// Git working copy
// ---------------------------------------------------------------------------

/// A local working copy. One run owns it exclusively; nothing here locks.
#[derive(Debug, Clone)]
pub struct Git {
    dir: PathBuf,
}

impl Git {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Run git with `args`, returning the full captured output.
    pub fn output(&self, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.output_with_env(args, &[])
    }

    /// Like [`Git::output`], with extra environment variables for this call only.
    pub fn output_with_env(
        &self,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<CommandOutput, CommandError> {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(&self.dir)
            // --continue must never wait on an interactive editor
            .env("GIT_EDITOR", "true")
            .envs(env.iter().copied());
        let out = execute(cmd, render("git", args))?;
        if !out.stdout.is_empty() {
            tracing::debug!("git {}: {}", args.join(" "), out.stdout.trim_end());
        }
        Ok(out)
    }

    /// Run git with `args`, returning captured stdout.
    pub fn run(&self, args: &[&str]) -> Result<String, CommandError> {
        self.output(args).map(|o| o.stdout)
    }

    /// True when the command exits zero. Used for probes whose failure is an answer.
    pub fn succeeds(&self, args: &[&str]) -> bool {
        self.output(args).is_ok()
    }

    /// True when `rev` resolves to a commit.
    pub fn rev_exists(&self, rev: &str) -> bool {
        self.succeeds(&["rev-parse", "--verify", "--quiet", &format!("{rev}^{{commit}}")])
    }

    /// True when the fully qualified ref (e.g. `refs/remotes/u/b`) exists.
    pub fn ref_exists(&self, refname: &str) -> bool {
        self.succeeds(&["show-ref", "--verify", "--quiet", refname])
    }

    pub fn rev_parse(&self, rev: &str) -> Result<String, CommandError> {
        self.run(&["rev-parse", "--verify", &format!("{rev}^{{commit}}")])
            .map(|s| s.trim().to_owned())
    }

    /// Subject line of `rev`, if it resolves.
    pub fn commit_subject(&self, rev: &str) -> Option<String> {
        if !self.rev_exists(rev) {
            return None;
        }
        self.run(&["log", "-1", "--format=%s", rev])
            .ok()
            .map(|s| s.trim().to_owned())
    }

    /// Absolute path of a file inside the git directory (`rebase-merge`, …).
    pub fn git_path(&self, name: &str) -> Result<PathBuf, CommandError> {
        let raw = self.run(&["rev-parse", "--git-path", name])?;
        let p = PathBuf::from(raw.trim());
        Ok(if p.is_absolute() { p } else { self.dir.join(p) })
    }

    pub fn rebase_in_progress(&self) -> bool {
        ["rebase-merge", "rebase-apply"]
            .iter()
            .any(|name| self.git_path(name).map(|p| p.exists()).unwrap_or(false))
    }

    pub fn cherry_pick_in_progress(&self) -> bool {
        self.rev_exists("CHERRY_PICK_HEAD")
    }

    /// Current branch name; `None` when HEAD is detached.
    pub fn current_branch(&self) -> Option<String> {
        self.run(&["symbolic-ref", "--quiet", "--short", "HEAD"])
            .ok()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
    }
}
