use std::path::Path;

use anyhow::Result;

use handin::plan::StudentInfo;
use handin::planner::DEFAULT_REQUIRED_FILES;
use handin::readme::ReadmeGenerator;

pub fn execute(
    repo_path: &Path,
    student: &StudentInfo,
    deliverables: &[String],
    how_to_run: Option<&str>,
    contact_email: Option<&str>,
) -> Result<()> {
    let deliverables: Vec<String> = if deliverables.is_empty() {
        DEFAULT_REQUIRED_FILES.iter().map(|s| s.to_string()).collect()
    } else {
        deliverables.to_vec()
    };

    let generator = ReadmeGenerator::new(&student.name, &student.university, &student.department);
    let content =
        generator.generate_readme(&deliverables, &student.repo_url, how_to_run, contact_email);
    generator.save_readme(&content, repo_path)?;

    println!("✓ README.md saved to {}", repo_path.join("README.md").display());

    for (field, present) in generator.validate_readme(&content) {
        if !present {
            println!("⚠ self-check: {} not satisfied", field);
        }
    }

    Ok(())
}
