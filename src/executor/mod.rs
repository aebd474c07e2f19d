//! Executor: performs concrete plan actions against a repository.
//!
//! Every operation returns an [`ExecutionResult`] and never propagates an
//! error past its own boundary. Filesystem trouble, external-process
//! failures, unmatched README sections, and unknown action types are all
//! converted into failure results so a plan walk always runs to completion.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use regex::Regex;

use crate::emailer;
use crate::plan::{
    Action, ActionParameters, Details, ExecutionReport, ExecutionResult, Plan, StudentInfo,
};
use crate::planner::DEFAULT_REQUIRED_FILES;
use crate::readme::ReadmeGenerator;
use crate::vcs::{self, Vcs, VcsBackend};

pub mod process;

const TEST_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_COMMIT_MESSAGE: &str = "Add submission deliverables";
const DEFAULT_REMOTE: &str = "origin";
const DEFAULT_BRANCH: &str = "main";
const EMAIL_DRAFT_FILE: &str = "email_draft.txt";
const LOGS_DIR: &str = "interaction_logs";

/// README sections the gating validation requires, one pattern per section.
const README_PATTERNS: &[&str] = &[
    r"(?im)Title|^# ",
    r"(?i)Student|Name",
    r"(?i)University",
    r"(?i)Department",
    r"(?i)Deliverables",
    r"(?i)How to run|Installation",
    r"(?i)Contact",
];

fn readme_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        README_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("README patterns are valid"))
            .collect()
    })
}

pub struct Executor {
    repo_path: PathBuf,
    vcs: Box<dyn Vcs>,
    test_timeout: Duration,
    test_command: Option<String>,
}

impl Executor {
    pub fn new(repo_path: impl AsRef<Path>, backend: VcsBackend) -> Result<Self> {
        let repo_path = repo_path.as_ref().to_path_buf();
        if !repo_path.is_dir() {
            anyhow::bail!("Repository path {} is not a directory", repo_path.display());
        }
        let vcs = vcs::open(backend, &repo_path)?;
        Ok(Self {
            repo_path,
            vcs,
            test_timeout: TEST_TIMEOUT,
            test_command: None,
        })
    }

    /// Override the detected test command.
    pub fn with_test_command(mut self, command: impl Into<String>) -> Self {
        self.test_command = Some(command.into());
        self
    }

    pub fn with_test_timeout(mut self, timeout: Duration) -> Self {
        self.test_timeout = timeout;
        self
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Join a plan-supplied relative path onto the repo root, rejecting
    /// anything that would escape it.
    fn resolve_relative(&self, relative: &str) -> Result<PathBuf> {
        let path = Path::new(relative);
        for component in path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => anyhow::bail!("Path '{}' escapes the repository root", relative),
            }
        }
        Ok(self.repo_path.join(relative))
    }

    // ---------- Filesystem actions ----------

    /// Create placeholders for missing deliverables. Existing paths are left
    /// untouched; the first per-item failure stops the loop with no rollback.
    pub fn create_placeholders(&self, files: &[String]) -> ExecutionResult {
        let mut created = Vec::new();
        for file in files {
            if let Err(e) = self.ensure_path(file) {
                return ExecutionResult::fail(format!("Failed creating {}: {:#}", file, e));
            }
            created.push(file.clone());
        }
        ExecutionResult::ok_with("Placeholders ensured", Details::Created { created })
    }

    fn ensure_path(&self, relative: &str) -> Result<()> {
        let path = self.resolve_relative(relative)?;
        if relative.ends_with('/') {
            fs::create_dir_all(&path)
                .with_context(|| format!("Failed to create directory {}", path.display()))?;
            let keep = path.join(".gitkeep");
            if !keep.exists() {
                fs::write(&keep, "")
                    .with_context(|| format!("Failed to write {}", keep.display()))?;
            }
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {}", parent.display()))?;
            }
            if !path.exists() {
                fs::write(&path, format!("# Placeholder for {}\n", relative))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
        }
        Ok(())
    }

    /// Read-only existence scan over the required list.
    pub fn validate_required(&self, required: &[String]) -> ExecutionResult {
        let mut missing = Vec::new();
        for file in required {
            let path = match self.resolve_relative(file.trim_end_matches('/')) {
                Ok(path) => path,
                Err(e) => return ExecutionResult::fail(format!("{:#}", e)),
            };
            if !path.exists() {
                missing.push(file.clone());
            }
        }
        ExecutionResult {
            success: missing.is_empty(),
            message: "Validation complete".to_string(),
            details: Some(Details::Missing { missing }),
        }
    }

    /// Check README.md against the required section patterns.
    pub fn assert_readme_fields(&self) -> ExecutionResult {
        let path = self.repo_path.join("README.md");
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return ExecutionResult::fail("README not found"),
        };

        let missing_patterns: Vec<String> = readme_patterns()
            .iter()
            .filter(|re| !re.is_match(&content))
            .map(|re| re.as_str().to_string())
            .collect();

        ExecutionResult {
            success: missing_patterns.is_empty(),
            message: "README fields check".to_string(),
            details: Some(Details::MissingPatterns { missing_patterns }),
        }
    }

    // ---------- Tests ----------

    /// Run the repository's test suite. Absence of a tests directory or of
    /// the test runner itself is a skip, not a failure.
    pub fn run_tests(&self) -> ExecutionResult {
        if !self.repo_path.join("tests").exists() {
            return ExecutionResult::ok("No tests directory found; skipping");
        }

        let command = match &self.test_command {
            Some(command) => command.clone(),
            None => match detect_test_command(&self.repo_path) {
                Some(command) => command,
                None => return ExecutionResult::ok("Test runner not found; skipping"),
            },
        };

        match process::run_with_timeout(&command, &self.repo_path, self.test_timeout) {
            Ok(out) if out.timed_out => ExecutionResult::fail_with(
                format!("Test run timed out after {}s", self.test_timeout.as_secs()),
                Details::Output { output: out.output },
            ),
            Ok(out) => ExecutionResult {
                success: out.success(),
                message: "Tests executed".to_string(),
                details: Some(Details::Output { output: out.output }),
            },
            Err(e) => ExecutionResult::fail(format!("Test run failed: {:#}", e)),
        }
    }

    // ---------- Version control ----------

    /// Stage everything and commit, or no-op successfully when the work tree
    /// is clean.
    pub fn git_commit(&self, message: &str) -> ExecutionResult {
        let committed = (|| -> Result<bool> {
            self.vcs.stage_all()?;
            if self.vcs.has_changes()? {
                self.vcs.commit(message)?;
                Ok(true)
            } else {
                Ok(false)
            }
        })();

        match committed {
            Ok(true) => ExecutionResult::ok("Git commit complete"),
            Ok(false) => ExecutionResult::ok("Nothing to commit"),
            Err(e) => ExecutionResult::fail(format!("Git commit failed: {:#}", e)),
        }
    }

    pub fn git_push(&self, branch: &str) -> ExecutionResult {
        match self.vcs.push(DEFAULT_REMOTE, branch) {
            Ok(()) => ExecutionResult::ok("Git push complete"),
            Err(e) => ExecutionResult::fail(format!("Git push failed: {:#}", e)),
        }
    }

    // ---------- Documents ----------

    /// Render README.md from the student info and write it to the repo root.
    pub fn generate_readme(
        &self,
        student: &StudentInfo,
        parameters: &ActionParameters,
    ) -> ExecutionResult {
        let deliverables: Vec<String> = if parameters.deliverables.is_empty() {
            DEFAULT_REQUIRED_FILES.iter().map(|s| s.to_string()).collect()
        } else {
            parameters.deliverables.clone()
        };

        let generator =
            ReadmeGenerator::new(&student.name, &student.university, &student.department);
        let content = generator.generate_readme(
            &deliverables,
            &student.repo_url,
            parameters.how_to_run.as_deref(),
            parameters.contact_email.as_deref(),
        );

        match generator.save_readme(&content, &self.repo_path) {
            Ok(()) => ExecutionResult::ok_with(
                "README.md generated",
                Details::Written {
                    path: self.repo_path.join("README.md").display().to_string(),
                },
            ),
            Err(e) => ExecutionResult::fail(format!("Failed to write README: {:#}", e)),
        }
    }

    /// Render the submission email and write `email_draft.txt`.
    pub fn create_email_draft(
        &self,
        student: &StudentInfo,
        parameters: &ActionParameters,
    ) -> ExecutionResult {
        let draft = emailer::build_email(student, &parameters.recipients, &parameters.deliverables);
        let path = self.repo_path.join(EMAIL_DRAFT_FILE);
        match emailer::save_draft(&path, &draft) {
            Ok(()) => ExecutionResult::ok_with(
                "Email draft created",
                Details::Written {
                    path: path.display().to_string(),
                },
            ),
            Err(e) => ExecutionResult::fail(format!("Failed to create email draft: {:#}", e)),
        }
    }

    // ---------- Orchestration ----------

    /// Walk the plan once, in order. Every action is attempted exactly once;
    /// a failure never halts the walk.
    pub fn execute_plan(&self, plan: &Plan) -> ExecutionReport {
        let student = plan.student_info();
        let mut report = ExecutionReport::default();

        for (i, record) in plan.actions.iter().enumerate() {
            let result = match record.resolve() {
                Some(Action::CreateMissingFiles { files }) => self.create_placeholders(&files),
                Some(Action::GenerateReadme { parameters }) => {
                    self.generate_readme(&student, &parameters)
                }
                Some(Action::RunTests) => self.run_tests(),
                Some(Action::GitCommit) => self.git_commit(DEFAULT_COMMIT_MESSAGE),
                Some(Action::GitPush) => self.git_push(DEFAULT_BRANCH),
                Some(Action::GenerateEmail { parameters }) => {
                    self.create_email_draft(&student, &parameters)
                }
                None => ExecutionResult::fail(format!("Unknown action: {}", record.action_type)),
            };
            report.record(i + 1, &record.action_type, result);
        }

        report
    }

    /// Persist a report to `interaction_logs/execution_<timestamp>.json`.
    /// Filenames are append-only; an existing log is never rewritten.
    pub fn write_report(&self, report: &ExecutionReport) -> Result<PathBuf> {
        let logs_dir = self.repo_path.join(LOGS_DIR);
        fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create {}", logs_dir.display()))?;

        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let path = logs_dir.join(format!("execution_{}.json", stamp));
        let json = serde_json::to_string_pretty(&report.to_json())
            .context("Failed to serialize execution report")?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Pick a test command from repository marker files, requiring the runner to
/// be on PATH.
fn detect_test_command(repo_path: &Path) -> Option<String> {
    if repo_path.join("Cargo.toml").exists() {
        return which::which("cargo").ok().map(|_| "cargo test --quiet".to_string());
    }
    if repo_path.join("package.json").exists() {
        return which::which("npm").ok().map(|_| "npm test --silent".to_string());
    }
    for python in ["python3", "python"] {
        if which::which(python).is_ok() {
            return Some(format!("{} -m pytest -q", python));
        }
    }
    None
}
