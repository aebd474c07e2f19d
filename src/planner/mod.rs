//! Planner: inspects repository state and derives a submission plan.
//!
//! The scan is a plain existence check over a short list of relative paths.
//! No recursion into directories, no hashing, no mtime comparison; a path
//! that cannot be read counts as missing.

use std::path::{Path, PathBuf};

use crate::plan::{ActionRecord, Plan, StudentInfo};

/// Deliverables every submission repository is expected to carry.
/// A trailing slash marks a directory.
pub const DEFAULT_REQUIRED_FILES: &[&str] = &[
    "README.md",
    "src/",
    "docs/architecture.md",
    "docs/report.pdf",
    "interaction_logs/",
    "tests/",
];

/// Split of the required list into present and absent entries.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliverableStatus {
    pub existing: Vec<String>,
    pub missing: Vec<String>,
}

pub struct DeliverablePlanner {
    repo_path: PathBuf,
    required_files: Vec<String>,
}

impl DeliverablePlanner {
    pub fn new(repo_path: impl AsRef<Path>, required_files: Vec<String>) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            required_files,
        }
    }

    pub fn with_defaults(repo_path: impl AsRef<Path>) -> Self {
        Self::new(
            repo_path,
            DEFAULT_REQUIRED_FILES.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn required_files(&self) -> &[String] {
        &self.required_files
    }

    /// Check which required deliverables exist and which are missing.
    pub fn analyze_deliverables(&self) -> DeliverableStatus {
        let mut existing = Vec::new();
        let mut missing = Vec::new();

        for file in &self.required_files {
            let full_path = self.repo_path.join(file.trim_end_matches('/'));
            if full_path.exists() {
                existing.push(file.clone());
            } else {
                missing.push(file.clone());
            }
        }

        DeliverableStatus { existing, missing }
    }

    /// Derive the ordered human-readable step list for the current state.
    pub fn generate_plan(&self) -> Vec<String> {
        let status = self.analyze_deliverables();

        let mut plan = vec![
            "Check repository structure".to_string(),
            format!("Verify existing files: {}", status.existing.join(", ")),
        ];

        if !status.missing.is_empty() {
            plan.push(format!(
                "Create missing files/directories: {}",
                status.missing.join(", ")
            ));
        }

        plan.extend([
            "Generate README.md with student info and deliverables".to_string(),
            "Run validation tests".to_string(),
            "Commit all changes to git".to_string(),
            "Push to remote repository".to_string(),
            "Generate email draft for submission".to_string(),
        ]);

        plan
    }

    /// Derive the structured action plan for the current state.
    pub fn create_execution_plan(&self, student: &StudentInfo) -> Plan {
        let status = self.analyze_deliverables();

        let mut actions = Vec::new();
        if !status.missing.is_empty() {
            actions.push(ActionRecord::create_missing_files(status.missing));
        }
        actions.push(ActionRecord::new("generate_readme"));
        actions.push(ActionRecord::new("run_tests"));
        actions.push(ActionRecord::new("git_commit"));
        actions.push(ActionRecord::new("git_push"));
        actions.push(ActionRecord::generate_email(Vec::new()));

        Plan {
            actions,
            student_name: student.name.clone(),
            university: student.university.clone(),
            department: student.department.clone(),
            repo_url: student.repo_url.clone(),
        }
    }
}

/// Render a step list as the enumerated plan printed by `handin plan`.
pub fn render_plan(steps: &[String]) -> String {
    let mut out = String::from("=== DELIVERABLES SUBMISSION PLAN ===\n");
    for (i, step) in steps.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, step));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn planner_for(tmp: &TempDir) -> DeliverablePlanner {
        DeliverablePlanner::with_defaults(tmp.path())
    }

    #[test]
    fn test_missing_is_complement_of_existing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README.md"), "# hi").unwrap();
        fs::create_dir(tmp.path().join("tests")).unwrap();

        let status = planner_for(&tmp).analyze_deliverables();
        assert_eq!(status.existing, vec!["README.md", "tests/"]);
        assert_eq!(
            status.missing,
            vec![
                "src/",
                "docs/architecture.md",
                "docs/report.pdf",
                "interaction_logs/"
            ]
        );
        assert_eq!(
            status.existing.len() + status.missing.len(),
            DEFAULT_REQUIRED_FILES.len()
        );
    }

    #[test]
    fn test_plan_includes_create_step_only_when_missing() {
        let tmp = TempDir::new().unwrap();
        let with_missing = planner_for(&tmp).generate_plan();
        assert!(with_missing
            .iter()
            .any(|s| s.starts_with("Create missing files")));

        for entry in DEFAULT_REQUIRED_FILES {
            let path = tmp.path().join(entry.trim_end_matches('/'));
            if entry.ends_with('/') {
                fs::create_dir_all(&path).unwrap();
            } else {
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(&path, "x").unwrap();
            }
        }

        let complete = planner_for(&tmp).generate_plan();
        assert!(!complete.iter().any(|s| s.starts_with("Create missing files")));
        assert_eq!(complete.len(), with_missing.len() - 1);
        assert_eq!(complete.last().unwrap(), "Generate email draft for submission");
    }

    #[test]
    fn test_execution_plan_shape() {
        let tmp = TempDir::new().unwrap();
        let student = StudentInfo {
            name: "A".into(),
            university: "U".into(),
            department: "D".into(),
            repo_url: "http://r".into(),
        };

        let plan = planner_for(&tmp).create_execution_plan(&student);
        let types: Vec<_> = plan.actions.iter().map(|a| a.action_type.as_str()).collect();
        assert_eq!(
            types,
            vec![
                "create_missing_files",
                "generate_readme",
                "run_tests",
                "git_commit",
                "git_push",
                "generate_email"
            ]
        );
        assert_eq!(plan.actions[0].files.len(), DEFAULT_REQUIRED_FILES.len());
        assert_eq!(plan.student_name, "A");
        assert!(plan.ordering_warnings().is_empty());
    }

    #[test]
    fn test_render_plan_enumerates() {
        let rendered = render_plan(&["one".to_string(), "two".to_string()]);
        assert!(rendered.contains("1. one"));
        assert!(rendered.contains("2. two"));
    }
}
