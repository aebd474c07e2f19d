//! Version-control seam.
//!
//! Two backends behind one trait, picked at startup: the git CLI (default,
//! matches how the rest of the tool shells out) and libgit2 for environments
//! without a git binary on PATH.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;

pub mod cli;
pub mod libgit2;

pub use cli::CliGit;
pub use libgit2::LibGit2;

pub trait Vcs {
    /// True when the work tree has staged, unstaged, or untracked changes.
    fn has_changes(&self) -> Result<bool>;

    /// Stage every change, including untracked files.
    fn stage_all(&self) -> Result<()>;

    /// Commit the staged changes.
    fn commit(&self, message: &str) -> Result<()>;

    /// Push `branch` to `remote`.
    fn push(&self, remote: &str, branch: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VcsBackend {
    #[default]
    Cli,
    LibGit2,
}

impl FromStr for VcsBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cli" => Ok(Self::Cli),
            "libgit2" => Ok(Self::LibGit2),
            other => anyhow::bail!("Unknown vcs backend '{}' (expected cli or libgit2)", other),
        }
    }
}

impl fmt::Display for VcsBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "cli"),
            Self::LibGit2 => write!(f, "libgit2"),
        }
    }
}

/// Open the selected backend against a repository path.
pub fn open(backend: VcsBackend, repo_path: &Path) -> Result<Box<dyn Vcs>> {
    match backend {
        VcsBackend::Cli => Ok(Box::new(CliGit::new(repo_path))),
        VcsBackend::LibGit2 => Ok(Box::new(LibGit2::open(repo_path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("cli".parse::<VcsBackend>().unwrap(), VcsBackend::Cli);
        assert_eq!("libgit2".parse::<VcsBackend>().unwrap(), VcsBackend::LibGit2);
        assert!("svn".parse::<VcsBackend>().is_err());
    }

    #[test]
    fn test_backend_display_roundtrip() {
        for backend in [VcsBackend::Cli, VcsBackend::LibGit2] {
            assert_eq!(backend.to_string().parse::<VcsBackend>().unwrap(), backend);
        }
    }
}
