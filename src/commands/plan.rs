use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use handin::plan::StudentInfo;
use handin::planner::{self, DeliverablePlanner};

pub fn execute(
    repo_path: &Path,
    json: bool,
    out: Option<&Path>,
    student: &StudentInfo,
) -> Result<()> {
    let planner = DeliverablePlanner::with_defaults(repo_path);

    if json || out.is_some() {
        let plan = planner.create_execution_plan(student);
        let rendered =
            serde_json::to_string_pretty(&plan).context("Failed to serialize plan")?;

        if let Some(out_path) = out {
            fs::write(out_path, &rendered)
                .with_context(|| format!("Failed to write plan to {}", out_path.display()))?;
            println!("✓ Plan written to {}", out_path.display());
        }
        if json {
            println!("{}", rendered);
        }
    }

    if !json {
        let steps = planner.generate_plan();
        print!("{}", planner::render_plan(&steps));
    }

    Ok(())
}
