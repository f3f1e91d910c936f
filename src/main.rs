//! vidstats CLI
//!
//! Flattens short-video platform exports into tables and turns them into
//! engagement dashboards: KPIs, performance categories, hashtag and
//! creator rankings.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use vidstats::aggregator::PerformanceCategory;
use vidstats::commands::{
    display_schema, display_version, execute_analyze, execute_flatten, execute_run,
    validate_args, validate_options, validate_report_file, AnalysisOptions, AnalyzeArgs,
    FlattenArgs, RunArgs,
};
use vidstats::dashboard::FilterCriteria;
use vidstats::utils::AppConfig;

/// vidstats - engagement dashboards for short-video exports
#[derive(Parser, Debug)]
#[command(name = "vidstats")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML config file with field names and dashboard defaults
    #[arg(short, long, global = true, env = "VIDSTATS_CONFIG")]
    config: Option<PathBuf>,
}

/// Options shared by `analyze` and `run`
#[derive(Args, Debug)]
struct AnalysisFlags {
    /// Only videos whose caption mentions this hashtag
    #[arg(long)]
    hashtag: Option<String>,

    /// Only videos in these performance categories (High, Medium, Low)
    #[arg(long = "category")]
    categories: Vec<PerformanceCategory>,

    /// Only videos by these creators
    #[arg(long = "creator")]
    creators: Vec<String>,

    /// Output path for the JSON insights report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output path for the enriched CSV table
    #[arg(long)]
    enriched: Option<PathBuf>,

    /// Number of hashtags and creators to rank (defaults to config)
    #[arg(long)]
    top: Option<usize>,

    /// Print text summary to stdout
    #[arg(long)]
    summary: bool,
}

impl From<AnalysisFlags> for AnalysisOptions {
    fn from(flags: AnalysisFlags) -> Self {
        AnalysisOptions {
            output_report: flags.output,
            output_enriched: flags.enriched,
            filters: FilterCriteria {
                hashtag: flags.hashtag,
                categories: flags.categories,
                creators: flags.creators,
            },
            top_n: flags.top,
            print_summary: flags.summary,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Flatten an export into a CSV table
    Flatten {
        /// Exported records (JSON)
        #[arg(short, long, default_value = "export.json")]
        input: PathBuf,

        /// Output path for the flat table
        #[arg(short, long, default_value = "videos.csv")]
        output: PathBuf,
    },

    /// Derive metrics from a flat table and build the dashboard report
    Analyze {
        /// Flat CSV table
        #[arg(short, long, default_value = "videos.csv")]
        input: PathBuf,

        #[command(flatten)]
        flags: AnalysisFlags,
    },

    /// Flatten, persist and analyze in one go
    Run {
        /// Exported records (JSON)
        #[arg(short, long, default_value = "export.json")]
        input: PathBuf,

        /// Where to persist the flat table (failure is not fatal)
        #[arg(long, default_value = "videos.csv")]
        table: PathBuf,

        #[command(flatten)]
        flags: AnalysisFlags,
    },

    /// Validate an insights report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    let config = AppConfig::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Commands::Flatten { input, output } => {
            let args = FlattenArgs { input, output };
            validate_args(&args)?;
            execute_flatten(&args, &config)?;
        }

        Commands::Analyze { input, flags } => {
            let args = AnalyzeArgs {
                input,
                options: flags.into(),
            };
            validate_options(&args.options)?;
            execute_analyze(&args, &config)?;
        }

        Commands::Run {
            input,
            table,
            flags,
        } => {
            let args = RunArgs {
                input,
                table_output: table,
                options: flags.into(),
            };
            validate_options(&args.options)?;
            execute_run(&args, &config)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
