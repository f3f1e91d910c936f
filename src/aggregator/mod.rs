//! Aggregation of flat tables into derived metrics and insights.
//!
//! This module transforms flattened records into:
//! - Per-video hashtags, engagement rate and performance category
//! - Headline KPIs and per-category engagement statistics
//! - Hashtag and creator rankings

pub mod hashtags;
pub mod insights;
pub mod metrics;

// Re-export main types and functions
pub use hashtags::extract_hashtags;
pub use insights::{
    best_category, build_report, calculate_kpis, creator_rankings, engagement_distribution,
    hashtag_analysis, optimal_hashtag_count,
};
pub use metrics::{
    derive_metrics, engagement_rate, numeric_cell, percentile, text_cell, Counters,
    DerivationConfig, EnrichedRow, EnrichedTable, PerformanceCategory,
};
