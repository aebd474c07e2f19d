//! README generation and self-check.
//!
//! Pure string templating: deliverables render one bullet per item in input
//! order, interpolated verbatim (no escaping, dedup, or sorting).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

const DEFAULT_TITLE: &str = "Assignment Deliverables";
const DEFAULT_CONTACT: &str = "your.email@domain";

const DEFAULT_HOW_TO_RUN: &str = "\
1. Install the CLI:
   ```bash
   cargo install handin
   ```

2. Plan and execute the submission:
   ```bash
   handin plan --repo_path /path/to/repo
   handin execute --repo_path /path/to/repo --plan_path plan.json
   ```
";

pub struct ReadmeGenerator {
    student_name: String,
    university: String,
    department: String,
    title: String,
}

impl ReadmeGenerator {
    pub fn new(
        student_name: impl Into<String>,
        university: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            student_name: student_name.into(),
            university: university.into(),
            department: department.into(),
            title: DEFAULT_TITLE.to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render the complete README.md content.
    pub fn generate_readme(
        &self,
        deliverables: &[String],
        repo_url: &str,
        how_to_run: Option<&str>,
        contact_email: Option<&str>,
    ) -> String {
        let mut content = format!(
            "# {}\n\n\
             **Student:** {}  \n\
             **University:** {}  \n\
             **Department:** {}  \n\n\
             ## Repository\n{}\n\n\
             ## Deliverables included\n",
            self.title, self.student_name, self.university, self.department, repo_url
        );

        for deliverable in deliverables {
            content.push_str(&format!("- {}\n", deliverable));
        }

        content.push_str("\n## How to run\n");
        content.push_str(how_to_run.unwrap_or(DEFAULT_HOW_TO_RUN));
        if !content.ends_with('\n') {
            content.push('\n');
        }

        let contact = contact_email.unwrap_or(DEFAULT_CONTACT);
        content.push_str(&format!(
            "\n## Contact\n{} — [{}](mailto:{})\n",
            self.student_name, contact, contact
        ));

        content
    }

    /// Literal substring presence check per expected field. Self-check only;
    /// the executor's gating validation uses regex patterns instead.
    pub fn validate_readme(&self, content: &str) -> BTreeMap<&'static str, bool> {
        BTreeMap::from([
            ("has_student_name", content.contains(&self.student_name)),
            ("has_university", content.contains(&self.university)),
            ("has_department", content.contains(&self.department)),
            ("has_deliverables_section", content.contains("Deliverables")),
            ("has_how_to_run", content.contains("How to run")),
            ("has_contact", content.contains("Contact")),
        ])
    }

    /// Write rendered content to `<repo>/README.md`.
    pub fn save_readme(&self, content: &str, repo_path: &Path) -> Result<()> {
        let readme_path = repo_path.join("README.md");
        fs::write(&readme_path, content)
            .with_context(|| format!("Failed to write {}", readme_path.display()))?;
        Ok(())
    }
}
