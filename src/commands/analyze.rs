//! Analyze and run command implementations.
//!
//! The analyze command:
//! 1. Reads a flat table
//! 2. Derives per-video metrics
//! 3. Applies dashboard filters
//! 4. Aggregates insights
//! 5. Writes output files
//!
//! The run command does the flatten steps first and analyzes the in-memory
//! table, so a failed CSV write does not stop the analysis.

use super::flatten::load_and_flatten;
use super::models::{AnalysisOptions, AnalyzeArgs, RunArgs};
use crate::aggregator::{build_report, derive_metrics, EnrichedTable};
use crate::dashboard::apply_filters;
use crate::flatten::FlatTable;
use crate::output::{persist, read_table_csv, write_report, write_table_csv, PersistOutcome};
use crate::parser::schema::InsightsReport;
use crate::utils::config::AppConfig;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Everything an analysis produced
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// Rows on display, after filtering
    pub table: EnrichedTable,

    pub report: InsightsReport,
}

/// Result of the run command
///
/// The analysis is valid whether or not the flat table reached disk.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub analysis: AnalysisOutcome,
    pub persistence: PersistOutcome,
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable table
/// * A configured field missing from every row
/// * File write errors
pub fn execute_analyze(args: &AnalyzeArgs, config: &AppConfig) -> Result<AnalysisOutcome> {
    let start_time = Instant::now();

    info!("Step 1/5: Reading table...");
    let text_columns = [
        config.derive.text_field.as_str(),
        config.dashboard.creator_field.as_str(),
    ];
    let table = read_table_csv(&args.input, &text_columns)
        .with_context(|| format!("Failed to read table from {}", args.input.display()))?;

    let outcome = analyze_table(&table, &args.options, config)?;

    info!(
        "Analysis completed in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(outcome)
}

/// Execute the run command
///
/// **Public** - flatten, persist (best effort) and analyze in one go
pub fn execute_run(args: &RunArgs, config: &AppConfig) -> Result<RunOutcome> {
    let start_time = Instant::now();

    let table = load_and_flatten(&args.input, config)?;

    let persistence = persist(&table, &args.table_output);
    match &persistence {
        PersistOutcome::Persisted { path, rows } => {
            info!("✓ Table written to: {} ({} rows)", path.display(), rows)
        }
        PersistOutcome::Failed { reason, .. } => {
            warn!("Continuing with in-memory table: {}", reason)
        }
    }

    let analysis = analyze_table(&table, &args.options, config)?;

    info!("Run completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(RunOutcome {
        analysis,
        persistence,
    })
}

/// Derive, filter, aggregate and write outputs for a loaded table
fn analyze_table(
    table: &FlatTable,
    options: &AnalysisOptions,
    config: &AppConfig,
) -> Result<AnalysisOutcome> {
    info!("Step 2/5: Deriving metrics for {} rows...", table.len());
    let enriched = derive_metrics(table, &config.derive).context("Failed to derive metrics")?;

    info!("Step 3/5: Applying filters...");
    let selected = apply_filters(
        &enriched,
        &options.filters,
        &config.derive.text_field,
        &config.dashboard.creator_field,
    );
    debug!("{} of {} rows selected", selected.len(), enriched.len());

    let top_n = options.top_n.unwrap_or(config.dashboard.top_n);
    info!("Step 4/5: Aggregating insights (top {})...", top_n);
    let report = build_report(&selected, &config.dashboard.creator_field, top_n);

    info!("Step 5/5: Writing output files...");
    if let Some(path) = &options.output_report {
        write_report(&report, path).context("Failed to write insights report")?;
        info!("✓ Report written to: {}", path.display());
    }

    if let Some(path) = &options.output_enriched {
        write_table_csv(&selected.to_flat_table(), path)
            .context("Failed to write enriched table")?;
        info!("✓ Enriched table written to: {}", path.display());
    }

    if options.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("DASHBOARD SUMMARY");
        println!("{}", "=".repeat(80));
        println!("{}", report.summary());
        println!("{}", "=".repeat(80));
    }

    Ok(AnalysisOutcome {
        table: selected,
        report,
    })
}

/// Validate analysis options
///
/// **Public** - can be called before executing for early validation
pub fn validate_options(options: &AnalysisOptions) -> Result<()> {
    if let Some(top_n) = options.top_n {
        if top_n == 0 {
            anyhow::bail!("top must be greater than 0");
        }
        if top_n > 1000 {
            anyhow::bail!("top is too large (max 1000)");
        }
    }

    if let (Some(report), Some(enriched)) = (&options.output_report, &options.output_enriched) {
        if report == enriched {
            anyhow::bail!("Report and enriched table cannot share a path");
        }
    }

    Ok(())
}
