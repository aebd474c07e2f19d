use std::path::Path;

use anyhow::Result;

use handin::emailer;
use handin::plan::StudentInfo;

pub fn execute(
    repo_path: &Path,
    student: &StudentInfo,
    recipients: &[String],
    deliverables: &[String],
) -> Result<()> {
    let draft = emailer::build_email(student, recipients, deliverables);
    let path = repo_path.join("email_draft.txt");
    emailer::save_draft(&path, &draft)?;

    println!("✓ Email draft saved at {}", path.display());
    Ok(())
}
