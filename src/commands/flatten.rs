//! Flatten command implementation.
//!
//! The flatten command:
//! 1. Loads exported records
//! 2. Flattens them into a table
//! 3. Writes the table as CSV

use super::models::FlattenArgs;
use crate::flatten::{flatten, FlatTable};
use crate::output::write_table_csv;
use crate::parser::load_records;
use crate::utils::config::AppConfig;
use anyhow::{Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the flatten command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The flattened table (already written to `args.output`)
///
/// # Errors
/// * Unreadable or malformed export
/// * Malformed nested field in any record
/// * File write errors
pub fn execute_flatten(args: &FlattenArgs, config: &AppConfig) -> Result<FlatTable> {
    let start_time = Instant::now();

    let table = load_and_flatten(&args.input, config)?;

    info!("Step 3/3: Writing table...");
    write_table_csv(&table, &args.output).context("Failed to write flat table")?;

    info!("✓ Table written to: {}", args.output.display());
    info!(
        "Flatten completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(table)
}

/// Steps shared by the flatten and run commands
pub(crate) fn load_and_flatten(input: &std::path::Path, config: &AppConfig) -> Result<FlatTable> {
    info!("Step 1/3: Loading records...");
    let records = load_records(input)
        .with_context(|| format!("Failed to load records from {}", input.display()))?;

    info!("Step 2/3: Flattening {} records...", records.len());
    let table = flatten(&records, &config.flatten).context("Failed to flatten records")?;

    debug!("Columns: {}", table.columns().join(", "));

    Ok(table)
}

/// Validate flatten arguments
///
/// **Public** - can be called before executing for early validation
pub fn validate_args(args: &FlattenArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if args.output.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if args.input == args.output {
        anyhow::bail!("Output would overwrite the input export");
    }

    Ok(())
}
