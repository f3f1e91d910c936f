//! Flattening of nested export records into a uniform table.
//!
//! This module transforms raw records into:
//! - Flat rows with `<field>_<innerKey>` columns
//! - A table carrying the column union for persistence

pub mod flattener;
pub mod table;

// Re-export main types and functions
pub use flattener::{flatten, flatten_record, renest, FlattenConfig};
pub use table::FlatTable;
