//! CLI git backend against real temporary repositories.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use handin::vcs::{CliGit, Vcs};
use tempfile::TempDir;

/// Create a temporary git repo with an identity configured.
fn create_temp_repo() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let repo_path = dir.path().to_path_buf();

    let run = |args: &[&str]| {
        let output = Command::new("git")
            .args(args)
            .current_dir(&repo_path)
            .output()
            .unwrap_or_else(|e| panic!("git {} failed: {e}", args.join(" ")));
        assert!(output.status.success(), "git {} failed", args.join(" "));
    };

    run(&["init"]);
    run(&["config", "user.name", "Test Student"]);
    run(&["config", "user.email", "student@example.com"]);

    (dir, repo_path)
}

#[test]
fn stage_and_commit_clears_changes() {
    let (_dir, repo_path) = create_temp_repo();
    let vcs = CliGit::new(&repo_path);

    assert!(!vcs.has_changes().unwrap());

    fs::write(repo_path.join("README.md"), "# hi").unwrap();
    assert!(vcs.has_changes().unwrap());

    vcs.stage_all().unwrap();
    vcs.commit("Add README").unwrap();
    assert!(!vcs.has_changes().unwrap());
}

#[test]
fn untracked_files_count_as_changes() {
    let (_dir, repo_path) = create_temp_repo();
    let vcs = CliGit::new(&repo_path);

    fs::create_dir(repo_path.join("docs")).unwrap();
    fs::write(repo_path.join("docs/notes.md"), "notes").unwrap();
    assert!(vcs.has_changes().unwrap());
}

#[test]
fn push_without_remote_reports_error() {
    let (_dir, repo_path) = create_temp_repo();
    let vcs = CliGit::new(&repo_path);

    fs::write(repo_path.join("README.md"), "# hi").unwrap();
    vcs.stage_all().unwrap();
    vcs.commit("Add README").unwrap();

    let err = vcs.push("origin", "main").unwrap_err();
    assert!(err.to_string().contains("git push"));
}

#[test]
fn commit_outside_a_repo_fails() {
    let dir = TempDir::new().unwrap();
    let vcs = CliGit::new(dir.path());
    assert!(vcs.commit("nope").is_err());
}
