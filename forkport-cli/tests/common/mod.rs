//! Minimal on-disk repositories for driving the `forkport` binary.
//!
//! ```text
//! <root>/kubernetes/ingress-nginx   upstream: controller-v1.8.0, controller-v1.9.3
//! <root>/{rancher,alice}/ingress-nginx  bare forks holding hardened-nginx-1.8.x-fix
//! <root>/work/ingress-nginx         working copy, created by the binary
//! <root>/gitconfig                  holds alice's user.email
//! ```
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

pub const USER: &str = "alice";
pub const PREVIOUS: &str = "hardened-nginx-1.8.x-fix";
pub const CURRENT: &str = "hardened-nginx-1.9.x-fix";

pub const DRONE: &str = "Adding drone and build artifacts";
pub const BCI: &str = "Use BCI base image";
pub const GOWORK: &str = "Rancher go.work.sum changes";

pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.name=fixture", "-c", "user.email=fixture@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
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

fn commit_file(dir: &Path, rel: &str, contents: &str, message: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    std::fs::write(path, contents).expect("write");
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "--quiet", "-m", message]);
}

pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let root = TempDir::new().expect("root");
        let base = root.path();

        let upstream = base.join("kubernetes").join("ingress-nginx");
        std::fs::create_dir_all(&upstream).expect("mkdir upstream");
        git(&upstream, &["init", "--quiet"]);
        commit_file(&upstream, ".github/workflows/ci.yaml", "ci: v1\n", "Initial upstream");
        git(&upstream, &["tag", "controller-v1.8.0"]);
        commit_file(&upstream, ".github/workflows/ci.yaml", "ci: v2\n", "Release 1.9.3");
        git(&upstream, &["tag", "controller-v1.9.3"]);

        let builder = base.join("builder");
        git(base, &["clone", "--quiet", &upstream.to_string_lossy(), "builder"]);
        git(&builder, &["checkout", "--quiet", "-b", PREVIOUS, "controller-v1.8.0"]);
        git(&builder, &["rm", "--quiet", ".github/workflows/ci.yaml"]);
        commit_file(&builder, ".drone.yml", "kind: pipeline\n", DRONE);
        commit_file(&builder, "Dockerfile", "FROM bci\n", BCI);
        commit_file(&builder, "go.work.sum", "sum\n", GOWORK);

        for org in ["rancher", USER] {
            let fork = base.join(org).join("ingress-nginx");
            std::fs::create_dir_all(&fork).expect("mkdir fork");
            git(&fork, &["init", "--quiet", "--bare"]);
            git(&builder, &["push", "--quiet", &fork.to_string_lossy(), PREVIOUS]);
        }

        std::fs::write(base.join("gitconfig"), "[user]\n\temail = alice@example.com\n")
            .expect("write gitconfig");
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn workdir(&self) -> PathBuf {
        self.path().join("work").join("ingress-nginx")
    }
}
