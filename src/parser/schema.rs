//! Record and report schema definitions.
//!
//! Raw and flat records are schema-less JSON maps. The insights report is
//! the structure we write to disk; it is versioned to allow future evolution.

use crate::aggregator::PerformanceCategory;
use serde::{Deserialize, Serialize};

/// One exported video, exactly as the platform client produced it
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// One flattened video: qualified column name to value
pub type FlatRow = serde_json::Map<String, serde_json::Value>;

/// Top-level insights report written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Headline numbers
    pub kpis: Kpis,

    /// Hashtag count with the best mean engagement rate
    pub optimal_hashtag_count: Option<usize>,

    /// Performance category with the best mean engagement rate
    pub best_category: Option<PerformanceCategory>,

    /// Play-count thresholds the categories were computed against
    pub thresholds: Option<Thresholds>,

    /// Per-category statistics, High first
    pub engagement_distribution: Vec<CategoryStats>,

    /// Most frequent hashtags
    pub top_hashtags: Vec<HashtagStats>,

    /// Creators ranked by total plays
    pub top_creators: Vec<CreatorStats>,

    /// Timestamp when the report was generated
    pub generated_at: String,
}

/// Headline numbers over the analysed table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub video_count: usize,
    pub total_plays: f64,
    pub total_likes: f64,
    pub total_comments: f64,
    pub total_shares: f64,

    /// Mean engagement rate (percent), absent for an empty table
    pub avg_engagement_rate: Option<f64>,

    /// Mean number of hashtags per video, absent for an empty table
    pub avg_hashtags_per_video: Option<f64>,
}

/// 25th and 75th percentile of play count
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub p25: f64,
    pub p75: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: PerformanceCategory,
    pub video_count: usize,
    pub avg_engagement_rate: f64,
    pub avg_plays: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashtagStats {
    /// Lower-cased tag, without the leading `#`
    pub hashtag: String,
    pub occurrences: usize,
    pub total_plays: f64,
    pub avg_engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorStats {
    pub creator: String,
    pub video_count: usize,
    pub total_plays: f64,
    pub total_likes: f64,
    pub avg_engagement_rate: f64,
}
