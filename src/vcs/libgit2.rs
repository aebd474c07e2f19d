//! Git backend built on libgit2.
//!
//! Used where no git binary is available. Push credentials come from the
//! ssh agent or the configured credential helper.

use std::path::Path;

use anyhow::{Context, Result};
use git2::{Cred, CredentialType, IndexAddOption, PushOptions, RemoteCallbacks, Repository, StatusOptions};

use super::Vcs;

pub struct LibGit2 {
    repo: Repository,
}

impl LibGit2 {
    pub fn open(repo_path: &Path) -> Result<Self> {
        let repo = Repository::open(repo_path)
            .with_context(|| format!("Failed to open git repository at {}", repo_path.display()))?;
        Ok(Self { repo })
    }
}

impl Vcs for LibGit2 {
    fn has_changes(&self) -> Result<bool> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true).recurse_untracked_dirs(true);
        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .context("Failed to read repository status")?;
        Ok(!statuses.is_empty())
    }

    fn stage_all(&self) -> Result<()> {
        let mut index = self.repo.index().context("Failed to open index")?;
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .context("Failed to stage changes")?;
        index.write().context("Failed to write index")?;
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        let signature = self.repo.signature().context(
            "No git identity configured (set user.name and user.email)",
        )?;
        let mut index = self.repo.index().context("Failed to open index")?;
        let tree_oid = index.write_tree().context("Failed to write tree")?;
        let tree = self.repo.find_tree(tree_oid)?;

        // First commit on an unborn branch has no parent
        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit().context("Failed to resolve HEAD")?),
            Err(_) => None,
        };
        let parents: Vec<_> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .context("Failed to create commit")?;
        Ok(())
    }

    fn push(&self, remote: &str, branch: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .with_context(|| format!("Remote '{}' not found", remote))?;

        let config = self.repo.config().context("Failed to read git config")?;
        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(move |url, username, allowed| {
            if allowed.contains(CredentialType::SSH_KEY) {
                if let Some(user) = username {
                    return Cred::ssh_key_from_agent(user);
                }
            }
            Cred::credential_helper(&config, url, username).or_else(|_| Cred::default())
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
        remote
            .push(&[refspec.as_str()], Some(&mut options))
            .with_context(|| format!("Failed to push branch '{}'", branch))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo(tmp: &TempDir) -> LibGit2 {
        let repo = Repository::init(tmp.path()).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test Student").unwrap();
        config.set_str("user.email", "student@example.com").unwrap();
        drop(repo);
        LibGit2::open(tmp.path()).unwrap()
    }

    #[test]
    fn test_has_changes_tracks_untracked_files() {
        let tmp = TempDir::new().unwrap();
        let vcs = init_repo(&tmp);
        assert!(!vcs.has_changes().unwrap());

        fs::write(tmp.path().join("README.md"), "# hi").unwrap();
        assert!(vcs.has_changes().unwrap());
    }

    #[test]
    fn test_stage_and_commit_clears_changes() {
        let tmp = TempDir::new().unwrap();
        let vcs = init_repo(&tmp);

        fs::write(tmp.path().join("README.md"), "# hi").unwrap();
        vcs.stage_all().unwrap();
        vcs.commit("Add README").unwrap();
        assert!(!vcs.has_changes().unwrap());

        // second commit gets a parent
        fs::write(tmp.path().join("notes.txt"), "more").unwrap();
        vcs.stage_all().unwrap();
        vcs.commit("Add notes").unwrap();
        assert!(!vcs.has_changes().unwrap());
    }

    #[test]
    fn test_push_without_remote_fails() {
        let tmp = TempDir::new().unwrap();
        let vcs = init_repo(&tmp);
        let err = vcs.push("origin", "main").unwrap_err();
        assert!(err.to_string().contains("origin"));
    }
}
