//! Plan and execution-result types shared by the planner and executor.
//!
//! A plan file is plain JSON: a list of `{type, files?, parameters?}` action
//! records plus the student metadata the actions need. Records keep their
//! type as a raw string so an unrecognized action becomes a failed step at
//! execution time instead of rejecting the whole plan at parse time.

use serde::{Deserialize, Serialize};

/// Student metadata carried through planning, document generation and execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentInfo {
    pub name: String,
    pub university: String,
    pub department: String,
    pub repo_url: String,
}

/// A submission plan as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub repo_url: String,
}

impl Plan {
    pub fn student_info(&self) -> StudentInfo {
        StudentInfo {
            name: self.student_name.clone(),
            university: self.university.clone(),
            department: self.department.clone(),
            repo_url: self.repo_url.clone(),
        }
    }

    /// Flag commit/push actions that precede placeholder or README
    /// generation. Ordering stays caller convention; the warnings are
    /// printed before execution, never enforced.
    pub fn ordering_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let first_vcs = self
            .actions
            .iter()
            .position(|a| matches!(a.action_type.as_str(), "git_commit" | "git_push"));

        if let Some(vcs_idx) = first_vcs {
            for (idx, action) in self.actions.iter().enumerate().skip(vcs_idx + 1) {
                if matches!(
                    action.action_type.as_str(),
                    "create_missing_files" | "generate_readme"
                ) {
                    warnings.push(format!(
                        "action {} '{}' runs after '{}' at position {}; generated files will not be committed",
                        idx + 1,
                        action.action_type,
                        self.actions[vcs_idx].action_type,
                        vcs_idx + 1,
                    ));
                }
            }
        }
        warnings
    }
}

/// One raw action record from a plan file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionRecord {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    #[serde(default, skip_serializing_if = "ActionParameters::is_empty")]
    pub parameters: ActionParameters,
}

impl ActionRecord {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            ..Default::default()
        }
    }

    pub fn create_missing_files(files: Vec<String>) -> Self {
        Self {
            action_type: "create_missing_files".to_string(),
            files,
            ..Default::default()
        }
    }

    pub fn generate_email(recipients: Vec<String>) -> Self {
        Self {
            action_type: "generate_email".to_string(),
            parameters: ActionParameters {
                recipients,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Resolve into a typed action. `None` means the type string is not one
    /// of the recognized actions.
    pub fn resolve(&self) -> Option<Action> {
        match self.action_type.as_str() {
            "create_missing_files" => Some(Action::CreateMissingFiles {
                files: self.files.clone(),
            }),
            "generate_readme" => Some(Action::GenerateReadme {
                parameters: self.parameters.clone(),
            }),
            "run_tests" => Some(Action::RunTests),
            "git_commit" => Some(Action::GitCommit),
            "git_push" => Some(Action::GitPush),
            "generate_email" => Some(Action::GenerateEmail {
                parameters: self.parameters.clone(),
            }),
            _ => None,
        }
    }
}

/// Optional knobs an action record may carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionParameters {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recipients: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deliverables: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_to_run: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
}

impl ActionParameters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Closed set of executable actions. The executor matches this exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    CreateMissingFiles { files: Vec<String> },
    GenerateReadme { parameters: ActionParameters },
    RunTests,
    GitCommit,
    GitPush,
    GenerateEmail { parameters: ActionParameters },
}

/// Outcome of one executed action. Created once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

impl ExecutionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: None,
        }
    }

    pub fn ok_with(message: impl Into<String>, details: Details) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn fail_with(message: impl Into<String>, details: Details) -> Self {
        Self {
            success: false,
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Per-action detail payloads. One shape per action family instead of a
/// free-form map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Details {
    Created { created: Vec<String> },
    Missing { missing: Vec<String> },
    MissingPatterns { missing_patterns: Vec<String> },
    Output { output: String },
    Written { path: String },
}

/// Ordered results of a plan walk, keyed `NN_type` (1-based, zero-padded so
/// the serialized object sorts back into plan order).
#[derive(Debug, Default)]
pub struct ExecutionReport {
    entries: Vec<(String, ExecutionResult)>,
}

impl ExecutionReport {
    pub fn record(&mut self, index: usize, action_type: &str, result: ExecutionResult) {
        self.entries
            .push((format!("{:02}_{}", index, action_type), result));
    }

    pub fn entries(&self) -> &[(String, ExecutionResult)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn all_succeeded(&self) -> bool {
        self.entries.iter().all(|(_, r)| r.success)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, result) in &self.entries {
            // results are plain data; serialization cannot fail
            map.insert(
                key.clone(),
                serde_json::to_value(result).unwrap_or(serde_json::Value::Null),
            );
        }
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_roundtrip() {
        let json = r#"{
            "actions": [
                {"type": "create_missing_files", "files": ["docs/report.pdf"]},
                {"type": "generate_readme"},
                {"type": "run_tests"},
                {"type": "git_commit"},
                {"type": "git_push"},
                {"type": "generate_email", "parameters": {"recipients": ["a@b.com"]}}
            ],
            "student_name": "A",
            "university": "U",
            "department": "D",
            "repo_url": "http://r"
        }"#;

        let plan: Plan = serde_json::from_str(json).unwrap();
        assert_eq!(plan.actions.len(), 6);
        assert_eq!(plan.student_info().name, "A");

        let back = serde_json::to_string(&plan).unwrap();
        let again: Plan = serde_json::from_str(&back).unwrap();
        assert_eq!(again.actions[0].files, vec!["docs/report.pdf"]);
        assert_eq!(again.actions[5].parameters.recipients, vec!["a@b.com"]);
    }

    #[test]
    fn test_resolve_known_types() {
        assert_eq!(
            ActionRecord::new("run_tests").resolve(),
            Some(Action::RunTests)
        );
        assert_eq!(
            ActionRecord::new("git_commit").resolve(),
            Some(Action::GitCommit)
        );
        assert!(matches!(
            ActionRecord::create_missing_files(vec!["x".into()]).resolve(),
            Some(Action::CreateMissingFiles { files }) if files == vec!["x".to_string()]
        ));
    }

    #[test]
    fn test_resolve_unknown_type() {
        assert_eq!(ActionRecord::new("teleport").resolve(), None);
    }

    #[test]
    fn test_report_keys_preserve_order() {
        let mut report = ExecutionReport::default();
        report.record(1, "run_tests", ExecutionResult::ok("ok"));
        report.record(2, "git_commit", ExecutionResult::fail("bad"));

        let keys: Vec<_> = report.entries().iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["01_run_tests", "02_git_commit"]);
        assert!(!report.all_succeeded());

        let json = report.to_json();
        assert_eq!(json["01_run_tests"]["success"], true);
        assert_eq!(json["02_git_commit"]["success"], false);
    }

    #[test]
    fn test_ordering_warnings() {
        let plan = Plan {
            actions: vec![
                ActionRecord::new("git_commit"),
                ActionRecord::new("generate_readme"),
            ],
            ..Default::default()
        };
        let warnings = plan.ordering_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("generate_readme"));

        let ordered = Plan {
            actions: vec![
                ActionRecord::new("generate_readme"),
                ActionRecord::new("git_commit"),
            ],
            ..Default::default()
        };
        assert!(ordered.ordering_warnings().is_empty());
    }

    #[test]
    fn test_details_serialization_shapes() {
        let created = serde_json::to_value(Details::Created {
            created: vec!["a".into()],
        })
        .unwrap();
        assert_eq!(created["created"][0], "a");

        let missing = serde_json::to_value(Details::Missing {
            missing: vec!["b".into()],
        })
        .unwrap();
        assert_eq!(missing["missing"][0], "b");
    }
}
