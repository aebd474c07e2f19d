//! Git backend that shells out to the `git` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use anyhow::{Context, Result};

use super::Vcs;

pub struct CliGit {
    repo_path: PathBuf,
}

impl CliGit {
    pub fn new(repo_path: impl AsRef<Path>) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    fn git(&self, args: &[&str]) -> Result<Output> {
        Command::new("git")
            .current_dir(&self.repo_path)
            .args(args)
            .output()
            .with_context(|| format!("Failed to run git {}", args.join(" ")))
    }

    fn git_checked(&self, args: &[&str]) -> Result<()> {
        let output = self.git(args)?;
        if !output.status.success() {
            anyhow::bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

impl Vcs for CliGit {
    fn has_changes(&self) -> Result<bool> {
        let output = self.git(&["status", "--porcelain"])?;
        if !output.status.success() {
            anyhow::bail!(
                "git status failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(!output.stdout.is_empty())
    }

    fn stage_all(&self) -> Result<()> {
        self.git_checked(&["add", "--all"])
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git_checked(&["commit", "-m", message])
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.git_checked(&["push", remote, branch])
    }
}
