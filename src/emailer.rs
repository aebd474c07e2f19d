//! Submission email draft: rendered to plain text the student can paste
//! into any mail client.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::plan::StudentInfo;

const SUBJECT_PREFIX: &str = "Deliverables submitted";

fn default_deliverables() -> Vec<String> {
    vec![
        "Source code (src/)".to_string(),
        "Architecture document (docs/architecture.md)".to_string(),
        "Report (docs/report.pdf)".to_string(),
        "Interaction logs (interaction_logs/)".to_string(),
    ]
}

#[derive(Debug, Clone)]
pub struct EmailDraft {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// Full draft text. The `To:` line comes first so recipients are visible
    /// at a glance even with an empty list.
    pub fn render(&self) -> String {
        format!(
            "To: {}\nSubject: {}\n\n{}",
            self.to.join(", "),
            self.subject,
            self.body
        )
    }
}

/// Build the submission email from student metadata and the deliverables
/// list. An empty deliverables list falls back to the standard set.
pub fn build_email(
    student: &StudentInfo,
    recipients: &[String],
    deliverables: &[String],
) -> EmailDraft {
    let items = if deliverables.is_empty() {
        default_deliverables()
    } else {
        deliverables.to_vec()
    };
    let bullet_list = items
        .iter()
        .map(|d| format!("- {}", d))
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        "Hello,\n\n\
         I have pushed all deliverables for the assignment to the following repository:\n\
         {}\n\n\
         Student: {}\n\
         University: {}\n\
         Department: {}\n\n\
         Deliverables:\n{}\n\n\
         Please let me know if anything else is required.\n\n\
         Regards,\n{}\n",
        student.repo_url,
        student.name,
        student.university,
        student.department,
        bullet_list,
        student.name
    );

    EmailDraft {
        to: recipients.to_vec(),
        subject: format!("{} ({})", SUBJECT_PREFIX, student.name),
        body,
    }
}

/// Write the draft to disk, usually `<repo>/email_draft.txt`.
pub fn save_draft(path: &Path, draft: &EmailDraft) -> Result<()> {
    fs::write(path, draft.render())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> StudentInfo {
        StudentInfo {
            name: "A".into(),
            university: "U".into(),
            department: "D".into(),
            repo_url: "http://r".into(),
        }
    }

    #[test]
    fn test_first_line_carries_recipients() {
        let draft = build_email(&student(), &["a@b.com".to_string()], &[]);
        let rendered = draft.render();
        let first = rendered.lines().find(|l| !l.trim().is_empty()).unwrap();
        assert!(first.contains("a@b.com"));
    }

    #[test]
    fn test_subject_contains_student_name() {
        let draft = build_email(&student(), &[], &[]);
        assert!(draft.subject.contains("A"));
        assert!(draft.render().contains("Subject: Deliverables submitted (A)"));
    }

    #[test]
    fn test_body_fields_and_default_deliverables() {
        let draft = build_email(&student(), &[], &[]);
        assert!(draft.body.contains("http://r"));
        assert!(draft.body.contains("Student: A"));
        assert!(draft.body.contains("University: U"));
        assert!(draft.body.contains("Department: D"));
        assert!(draft.body.contains("- Source code (src/)"));
    }

    #[test]
    fn test_explicit_deliverables_override_defaults() {
        let draft = build_email(&student(), &[], &["x".to_string(), "y".to_string()]);
        assert!(draft.body.contains("- x\n- y"));
        assert!(!draft.body.contains("Source code (src/)"));
    }

    #[test]
    fn test_save_draft() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("email_draft.txt");
        let draft = build_email(&student(), &["a@b.com".to_string()], &[]);
        save_draft(&path, &draft).unwrap();

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.starts_with("To: a@b.com"));
    }
}
