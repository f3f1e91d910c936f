//! Record loading and schema definitions.
//!
//! This module handles:
//! - Reading exported records from JSON
//! - Validating the export shape
//! - Defining the report schema

pub mod records;
pub mod schema;

// Re-export main types
pub use records::{load_records, parse_records, value_kind};
pub use schema::{
    CategoryStats, CreatorStats, FlatRow, HashtagStats, InsightsReport, Kpis, RawRecord,
    Thresholds,
};
