use crate::output::read_report;
use crate::utils::config::REPORT_VERSION;
use anyhow::Result;
use std::path::Path;

/// Validate an insights report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)?;

    println!("✓ Valid insights report");
    println!("  Version: {}", report.version);
    println!("  Generated: {}", report.generated_at);
    println!("  Videos: {}", report.kpis.video_count);
    println!("  Total Plays: {:.0}", report.kpis.total_plays);
    println!("  Top Hashtags: {}", report.top_hashtags.len());
    println!("  Top Creators: {}", report.top_creators.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Video Stats Insights Report Schema");
    println!("Current Version: {}", REPORT_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string                 - Schema version (e.g., '1.0.0')");
        println!("  kpis: object                    - Headline numbers");
        println!("    video_count: number           - Videos in the analysed table");
        println!("    total_plays/likes/comments/shares: number");
        println!("    avg_engagement_rate: number?  - Mean engagement (percent)");
        println!("    avg_hashtags_per_video: number?");
        println!("  optimal_hashtag_count: number?  - Hashtag count with best engagement");
        println!("  best_category: string?          - High, Medium or Low");
        println!("  thresholds: object?             - Play-count p25 / p75");
        println!("  engagement_distribution: array  - Per-category statistics");
        println!("  top_hashtags: array             - Most frequent hashtags");
        println!("  top_creators: array             - Creators ranked by plays");
        println!("  generated_at: string            - RFC 3339 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("vidstats v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_VERSION);
    println!();
    println!("Flattens short-video exports and builds engagement dashboards.");
}
