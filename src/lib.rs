pub mod emailer;
pub mod executor;
pub mod plan;
pub mod planner;
pub mod readme;
pub mod vcs;

// Re-export commonly used types
pub use executor::Executor;
pub use plan::{ExecutionReport, ExecutionResult, Plan, StudentInfo};
pub use planner::DeliverablePlanner;
