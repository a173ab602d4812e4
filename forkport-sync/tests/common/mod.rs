//! Shared on-disk git fixture for the engine integration tests.
//!
//! ```text
//! <root>/kubernetes/ingress-nginx   upstream (tags controller-v1.8.0 … v1.9.4)
//! <root>/rancher/ingress-nginx      bare org fork: hardened-nginx-1.8.x-fix
//! <root>/alice/ingress-nginx        bare user fork: 1.8 branch, optionally 1.9
//! <root>/work/ingress-nginx         working copy managed by forkport
//! <root>/gitconfig                  "global" config holding user.email
//! ```
//!
//! `controller-v1.9.4` edits `ci.yaml` and deletes the nginx rootfs
//! Dockerfile, so replaying onto it conflicts with the drone patch and,
//! for the built-in layout, with the hardened nginx patch.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use forkport_core::types::{PatchAction, PatchEntry, PatchSeries};
use forkport_core::SyncConfig;
use forkport_sync::RebaseRequest;
use tempfile::TempDir;

pub const USER: &str = "alice";
pub const PREVIOUS: &str = "hardened-nginx-1.8.x-fix";
pub const CURRENT: &str = "hardened-nginx-1.9.x-fix";

pub const DRONE: &str = "Adding drone and build artifacts";
pub const BCI: &str = "Use BCI base image";
pub const GOWORK: &str = "Rancher go.work.sum changes";
pub const HARDENED: &str = "Hardened Nginx and S390x changes";

pub const ROOTFS_DOCKERFILE: &str = "images/nginx/rootfs/Dockerfile";

pub fn git(dir: &Path, args: &[&str]) -> String {
    git_at(dir, args, "2023-01-01T00:00:00+00:00")
}

pub fn git_at(dir: &Path, args: &[&str], date: &str) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=fixture", "-c", "user.email=fixture@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {:?} in {} failed: {}",
        args,
        dir.display(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}

fn write(dir: &Path, rel: &str, contents: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdir");
    }
    std::fs::write(path, contents).expect("write");
}

fn commit_all(dir: &Path, message: &str, date: &str) {
    git(dir, &["add", "-A"]);
    git_at(dir, &["commit", "--quiet", "-m", message], date);
}

/// The three-entry series the fixture branches carry, oldest first.
pub fn series() -> PatchSeries {
    PatchSeries::new(vec![
        PatchEntry::new(
            DRONE,
            PatchAction::Remove,
            &[".github/workflows/ci.yaml", ".github/workflows/depreview.yaml"],
        ),
        PatchEntry::plain(BCI),
        PatchEntry::plain(GOWORK),
    ])
}

/// Commit the three-entry series on top of whatever is checked out in `dir`.
fn apply_short_patches(dir: &Path) {
    git(dir, &["rm", "--quiet", ".github/workflows/ci.yaml"]);
    write(dir, ".drone.yml", "kind: pipeline\n");
    commit_all(dir, DRONE, "2023-06-01T00:00:00+00:00");

    write(dir, "Dockerfile", "FROM bci\n");
    commit_all(dir, BCI, "2023-06-02T00:00:00+00:00");

    write(dir, "go.work.sum", "sum\n");
    commit_all(dir, GOWORK, "2023-06-03T00:00:00+00:00");
}

/// Commit one patch per entry of [`PatchSeries::builtin`], subjects verbatim.
fn apply_builtin_patches(dir: &Path) {
    for (i, entry) in PatchSeries::builtin().iter().enumerate() {
        match entry.message.as_str() {
            DRONE => {
                git(dir, &["rm", "--quiet", ".github/workflows/ci.yaml"]);
                write(dir, ".drone.yml", "kind: pipeline\n");
            }
            HARDENED => {
                write(dir, ROOTFS_DOCKERFILE, "FROM hardened-nginx\n");
                write(dir, "images/nginx/rootfs/s390x.patch", "s390x\n");
            }
            other => write(dir, &format!("hardening/{i}.txt"), &format!("{other}\n")),
        }
        commit_all(dir, &entry.message, &format!("2023-07-{:02}T00:00:00+00:00", i + 1));
    }
}

/// Which series the fixture's hardened branches carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// [`series`]: drone, BCI, go.work.sum.
    Short,
    /// The full built-in ten-entry series.
    Builtin,
}

pub struct Fixture {
    pub root: TempDir,
    pub layout: Layout,
}

impl Fixture {
    /// Build the short-series fixture. With `current_on_user`, alice's fork
    /// also holds `hardened-nginx-1.9.x-fix` based on `controller-v1.9.0`.
    pub fn new(current_on_user: bool) -> Self {
        Self::with_layout(current_on_user, Layout::Short)
    }

    /// Like [`Fixture::new`], with branches carrying the built-in series.
    pub fn builtin(current_on_user: bool) -> Self {
        Self::with_layout(current_on_user, Layout::Builtin)
    }

    pub fn with_layout(current_on_user: bool, layout: Layout) -> Self {
        let root = TempDir::new().expect("root");
        let base = root.path();

        let upstream = base.join("kubernetes").join("ingress-nginx");
        std::fs::create_dir_all(&upstream).expect("mkdir upstream");
        git(&upstream, &["init", "--quiet"]);
        git(&upstream, &["symbolic-ref", "HEAD", "refs/heads/main"]);

        write(&upstream, "README.md", "upstream\n");
        write(&upstream, ".github/workflows/ci.yaml", "ci: v1\n");
        write(&upstream, "Dockerfile", "FROM base\n");
        write(&upstream, ROOTFS_DOCKERFILE, "FROM nginx\n");
        write(&upstream, "src.txt", "1.8.0\n");
        commit_all(&upstream, "Initial upstream", "2023-01-01T00:00:00+00:00");
        git(&upstream, &["tag", "controller-v1.8.0"]);

        write(&upstream, ".github/workflows/ci.yaml", "ci: v2\n");
        write(&upstream, "src.txt", "1.9.0\n");
        commit_all(&upstream, "Release 1.9.0", "2023-02-01T00:00:00+00:00");
        git(&upstream, &["tag", "controller-v1.9.0"]);

        write(&upstream, "src.txt", "1.9.3\n");
        commit_all(&upstream, "Release 1.9.3", "2023-03-01T00:00:00+00:00");
        git(&upstream, &["tag", "controller-v1.9.3"]);

        write(&upstream, ".github/workflows/ci.yaml", "ci: v3\n");
        git(&upstream, &["rm", "--quiet", ROOTFS_DOCKERFILE]);
        write(&upstream, "src.txt", "1.9.4\n");
        commit_all(&upstream, "Release 1.9.4", "2023-04-01T00:00:00+00:00");
        git(&upstream, &["tag", "controller-v1.9.4"]);

        write(&upstream, "chart.txt", "4.9.0\n");
        commit_all(&upstream, "Chart 4.9.0", "2023-05-01T00:00:00+00:00");
        git(&upstream, &["tag", "helm-chart-4.9.0"]);

        let apply_patches: fn(&Path) = match layout {
            Layout::Short => apply_short_patches,
            Layout::Builtin => apply_builtin_patches,
        };
        let builder = base.join("builder");
        git(base, &["clone", "--quiet", &upstream.to_string_lossy(), "builder"]);
        git(&builder, &["checkout", "--quiet", "-b", PREVIOUS, "controller-v1.8.0"]);
        apply_patches(&builder);
        git(&builder, &["checkout", "--quiet", "-b", CURRENT, "controller-v1.9.0"]);
        apply_patches(&builder);

        for org in ["rancher", USER] {
            let fork = base.join(org).join("ingress-nginx");
            std::fs::create_dir_all(&fork).expect("mkdir fork");
            git(&fork, &["init", "--quiet", "--bare"]);
            git(&builder, &["push", "--quiet", &fork.to_string_lossy(), PREVIOUS]);
        }
        if current_on_user {
            let fork = base.join(USER).join("ingress-nginx");
            git(&builder, &["push", "--quiet", &fork.to_string_lossy(), CURRENT]);
        }

        std::fs::write(
            base.join("gitconfig"),
            "[user]\n\tname = Alice\n\temail = alice@example.com\n",
        )
        .expect("write gitconfig");

        Self { root, layout }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn workdir(&self) -> PathBuf {
        self.path().join("work").join("ingress-nginx")
    }

    pub fn fork(&self, org: &str) -> PathBuf {
        self.path().join(org).join("ingress-nginx")
    }

    pub fn config(&self) -> SyncConfig {
        SyncConfig {
            url_template: format!("{}/{{org}}/ingress-nginx", self.path().display()),
            workdir: self.workdir(),
            gitconfig_path: Some(self.path().join("gitconfig")),
            patches: match self.layout {
                Layout::Short => series(),
                Layout::Builtin => PatchSeries::builtin(),
            },
            ..SyncConfig::default()
        }
    }

    pub fn request(&self, tag: Option<&str>) -> RebaseRequest {
        RebaseRequest {
            user: USER.to_owned(),
            tag: tag.map(str::to_owned),
            previous: None,
        }
    }

    /// Run git in the managed working copy.
    pub fn work_git(&self, args: &[&str]) -> String {
        git(&self.workdir(), args)
    }

    /// Subjects of the last `n` commits in the working copy, oldest first.
    pub fn last_subjects(&self, n: usize) -> Vec<String> {
        let out = self.work_git(&["log", "--format=%s", &format!("-{n}")]);
        let mut subjects: Vec<String> = out.lines().map(str::to_owned).collect();
        subjects.reverse();
        subjects
    }

    pub fn commit_of(&self, rev: &str) -> String {
        self.work_git(&["rev-parse", &format!("{rev}^{{commit}}")])
    }
}
