use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use handin::plan::StudentInfo;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Plan, validate and push assignment deliverables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StudentArgs {
    /// Student name
    #[arg(long, env = "STUDENT_NAME", default_value = "")]
    student_name: String,

    /// University
    #[arg(long, env = "UNIVERSITY", default_value = "")]
    university: String,

    /// Department
    #[arg(long, env = "DEPARTMENT", default_value = "")]
    department: String,

    /// Repository URL used in the README and email
    #[arg(long, default_value = "")]
    repo_url: String,
}

impl From<&StudentArgs> for StudentInfo {
    fn from(args: &StudentArgs) -> Self {
        Self {
            name: args.student_name.clone(),
            university: args.university.clone(),
            department: args.department.clone(),
            repo_url: args.repo_url.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a submission plan for a repository
    Plan {
        /// Path to the repository
        #[arg(long = "repo_path")]
        repo_path: PathBuf,

        /// Print the structured plan as JSON instead of the step list
        #[arg(short, long)]
        json: bool,

        /// Write the structured plan JSON to a file
        #[arg(long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        student: StudentArgs,
    },

    /// Execute a plan file against a repository
    Execute {
        /// Path to the repository
        #[arg(long = "repo_path")]
        repo_path: PathBuf,

        /// Path to the JSON plan file
        #[arg(long = "plan_path")]
        plan_path: PathBuf,

        /// Version-control backend (cli or libgit2)
        #[arg(long, default_value = "cli")]
        vcs: String,
    },

    /// Render README.md for a repository
    Readme {
        /// Path to the repository
        #[arg(long = "repo_path")]
        repo_path: PathBuf,

        #[command(flatten)]
        student: StudentArgs,

        /// Deliverable bullet item (repeatable)
        #[arg(long = "deliverable")]
        deliverables: Vec<String>,

        /// How-to-run block (default instructions if omitted)
        #[arg(long)]
        how_to_run: Option<String>,

        /// Contact email for the contact section
        #[arg(long)]
        contact_email: Option<String>,
    },

    /// Write the submission email draft
    Email {
        /// Path to the repository
        #[arg(long = "repo_path")]
        repo_path: PathBuf,

        #[command(flatten)]
        student: StudentArgs,

        /// Recipient address (repeatable)
        #[arg(long = "to")]
        recipients: Vec<String>,

        /// Deliverable bullet item (repeatable)
        #[arg(long = "deliverable")]
        deliverables: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan {
            repo_path,
            json,
            out,
            student,
        } => {
            let info = StudentInfo::from(&student);
            commands::plan::execute(&repo_path, json, out.as_deref(), &info)?;
        }
        Commands::Execute {
            repo_path,
            plan_path,
            vcs,
        } => {
            commands::execute::execute(&repo_path, &plan_path, &vcs)?;
        }
        Commands::Readme {
            repo_path,
            student,
            deliverables,
            how_to_run,
            contact_email,
        } => {
            let info = StudentInfo::from(&student);
            commands::readme::execute(
                &repo_path,
                &info,
                &deliverables,
                how_to_run.as_deref(),
                contact_email.as_deref(),
            )?;
        }
        Commands::Email {
            repo_path,
            student,
            recipients,
            deliverables,
        } => {
            let info = StudentInfo::from(&student);
            commands::email::execute(&repo_path, &info, &recipients, &deliverables)?;
        }
    }

    Ok(())
}
