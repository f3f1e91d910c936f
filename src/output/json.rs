//! JSON insights report writer.
//!
//! Writes InsightsReport structs to JSON files with proper formatting.

use super::{calculate_file_size, ensure_parent_dir, validate_path};
use crate::parser::schema::InsightsReport;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = build_report(&enriched, "author_uniqueId", 10);
/// write_report(&report, "report.json")?;
/// ```
pub fn write_report(
    report: &InsightsReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report).map_err(OutputError::SerializationFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!(
        "Report written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a report from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::ReadFailed` - File cannot be opened
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<InsightsReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;

    let report: InsightsReport =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Report loaded: version {}, {} videos",
        report.version, report.kpis.video_count
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::PerformanceCategory;
    use crate::parser::schema::{Kpis, Thresholds};
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn create_test_report() -> InsightsReport {
        InsightsReport {
            version: "1.0.0".to_string(),
            kpis: Kpis {
                video_count: 2,
                total_plays: 300.0,
                avg_engagement_rate: Some(4.5),
                ..Default::default()
            },
            optimal_hashtag_count: Some(3),
            best_category: Some(PerformanceCategory::Medium),
            thresholds: Some(Thresholds { p25: 125.0, p75: 175.0 }),
            engagement_distribution: vec![],
            top_hashtags: vec![],
            top_creators: vec![],
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_report(&report, path).unwrap();
        let loaded = read_report(path).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/report.json");

        write_report(&create_test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_write_to_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = write_report(&create_test_report(), temp_dir.path());
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
    }

    #[test]
    fn test_read_missing_report() {
        let result = read_report("/definitely/not/here.json");
        assert!(matches!(result, Err(OutputError::ReadFailed(_))));
    }

    #[test]
    fn test_category_serializes_by_name() {
        let text = serde_json::to_string(&create_test_report()).unwrap();
        assert!(text.contains("\"best_category\":\"Medium\""));
    }
}
