//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components and report progress through
//! `log`; errors carry `anyhow` context for the binary to print.

pub mod analyze;
pub mod flatten;
pub mod models;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_analyze, execute_run, validate_options, AnalysisOutcome, RunOutcome};
pub use flatten::{execute_flatten, validate_args};
pub use models::{AnalysisOptions, AnalyzeArgs, FlattenArgs, RunArgs};
pub use utils::{display_schema, display_version, validate_report_file};
