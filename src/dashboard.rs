//! Row selection for the dashboard view.
//!
//! Filters run in a fixed order: hashtag and creator filters select rows,
//! categories are recomputed against the selection, and only then is the
//! category filter applied. "High" always means high within what the
//! viewer selected.

use crate::aggregator::{text_cell, EnrichedTable, PerformanceCategory};
use log::debug;

/// What the viewer asked to see
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Hashtag to look for, with or without the leading `#`
    pub hashtag: Option<String>,

    /// Allowed categories; empty means all
    pub categories: Vec<PerformanceCategory>,

    /// Allowed creators; empty means all
    pub creators: Vec<String>,
}

impl FilterCriteria {
    /// Normalized hashtag needle, `None` when there is nothing to match
    fn hashtag_needle(&self) -> Option<String> {
        let tag = normalize_hashtag(self.hashtag.as_deref()?);
        (!tag.is_empty()).then_some(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.hashtag_needle().is_none() && self.categories.is_empty() && self.creators.is_empty()
    }
}

/// Case-insensitive substring match of a hashtag against caption text
pub fn matches_hashtag(text: &str, hashtag: &str) -> bool {
    text.to_lowercase().contains(&normalize_hashtag(hashtag))
}

/// Lower-cased hashtag without surrounding space or the leading `#`
fn normalize_hashtag(hashtag: &str) -> String {
    let tag = hashtag.trim();
    tag.strip_prefix('#').unwrap_or(tag).to_lowercase()
}

/// Select the rows the dashboard should display
///
/// **Public** - main entry point for filtering
///
/// # Arguments
/// * `table` - Enriched table to filter
/// * `criteria` - Viewer selection
/// * `text_field` - Column holding the caption
/// * `creator_field` - Column identifying the creator
pub fn apply_filters(
    table: &EnrichedTable,
    criteria: &FilterCriteria,
    text_field: &str,
    creator_field: &str,
) -> EnrichedTable {
    let mut selected = table.clone();

    if criteria.is_empty() {
        return selected;
    }

    if let Some(needle) = criteria.hashtag_needle() {
        selected.retain(|r| {
            text_cell(r.row.get(text_field))
                .is_some_and(|text| matches_hashtag(&text, &needle))
        });
    }

    if !criteria.creators.is_empty() {
        selected.retain(|r| {
            text_cell(r.row.get(creator_field))
                .is_some_and(|creator| criteria.creators.iter().any(|c| *c == *creator))
        });
    }

    selected.recategorize();

    if !criteria.categories.is_empty() {
        selected.retain(|r| criteria.categories.contains(&r.performance_category));
    }

    debug!("Filters kept {} of {} rows", selected.len(), table.len());

    selected
}
