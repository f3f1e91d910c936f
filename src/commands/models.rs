use crate::dashboard::FilterCriteria;
use std::path::PathBuf;

/// Arguments for the flatten command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct FlattenArgs {
    /// Exported records (JSON)
    pub input: PathBuf,

    /// Output path for the flat CSV table
    pub output: PathBuf,
}

impl Default for FlattenArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("export.json"),
            output: PathBuf::from("videos.csv"),
        }
    }
}

/// What to do with a table once it is loaded
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Output path for the JSON insights report (optional)
    pub output_report: Option<PathBuf>,

    /// Output path for the enriched CSV table (optional)
    pub output_enriched: Option<PathBuf>,

    /// Dashboard selection
    pub filters: FilterCriteria,

    /// Length of ranked lists (None = config value)
    pub top_n: Option<usize>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

/// Arguments for the analyze command
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Flat CSV table written by the flatten command
    pub input: PathBuf,

    pub options: AnalysisOptions,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("videos.csv"),
            options: AnalysisOptions::default(),
        }
    }
}

/// Arguments for the run command (flatten, persist, analyze)
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Exported records (JSON)
    pub input: PathBuf,

    /// Where to persist the flat table; failure here is not fatal
    pub table_output: PathBuf,

    pub options: AnalysisOptions,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("export.json"),
            table_output: PathBuf::from("videos.csv"),
            options: AnalysisOptions::default(),
        }
    }
}
