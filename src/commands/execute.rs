use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use handin::executor::Executor;
use handin::plan::Plan;
use handin::vcs::VcsBackend;

pub fn execute(repo_path: &Path, plan_path: &Path, vcs: &str) -> Result<()> {
    let backend: VcsBackend = vcs.parse()?;

    let content = fs::read_to_string(plan_path)
        .with_context(|| format!("Failed to read plan file {}", plan_path.display()))?;
    let plan: Plan = serde_json::from_str(&content)
        .with_context(|| format!("Invalid plan file {}", plan_path.display()))?;

    for warning in plan.ordering_warnings() {
        println!("{} {}", "⚠".yellow(), warning);
    }

    let executor = Executor::new(repo_path, backend)?;
    let report = executor.execute_plan(&plan);

    for (key, result) in report.entries() {
        let mark = if result.success {
            "✓".green()
        } else {
            "✗".red()
        };
        println!("{} {} - {}", mark, key, result.message);
    }

    let log_path = executor.write_report(&report)?;
    println!(
        "\nExecution complete. Results saved to: {}",
        log_path.display()
    );
    if !report.all_succeeded() {
        println!("{}", "Some actions failed; see the log for details.".yellow());
    }

    Ok(())
}
