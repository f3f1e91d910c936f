//! Derived per-video metrics: hashtags, engagement rate, performance category.
//!
//! Derivation takes two passes over the table. The first computes the
//! per-row values and collects play counts; the second classifies each row
//! against the table-wide 25th/75th percentile of play count. Categories
//! are therefore relative to the table they were computed against.

use super::hashtags::extract_hashtags;
use crate::flatten::FlatTable;
use crate::parser::schema::{FlatRow, Thresholds};
use crate::utils::config::{
    DEFAULT_COMMENT_FIELD, DEFAULT_LIKE_FIELD, DEFAULT_PLAY_COUNT_FIELD, DEFAULT_SHARE_FIELD,
    DEFAULT_TEXT_FIELD,
};
use crate::utils::error::DeriveError;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Column names the deriver reads from
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DerivationConfig {
    /// Free-text caption scanned for hashtags
    pub text_field: String,
    pub play_count_field: String,
    pub like_field: String,
    pub comment_field: String,
    pub share_field: String,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            text_field: DEFAULT_TEXT_FIELD.to_string(),
            play_count_field: DEFAULT_PLAY_COUNT_FIELD.to_string(),
            like_field: DEFAULT_LIKE_FIELD.to_string(),
            comment_field: DEFAULT_COMMENT_FIELD.to_string(),
            share_field: DEFAULT_SHARE_FIELD.to_string(),
        }
    }
}

impl DerivationConfig {
    fn fields(&self) -> [&str; 5] {
        [
            self.text_field.as_str(),
            self.play_count_field.as_str(),
            self.like_field.as_str(),
            self.comment_field.as_str(),
            self.share_field.as_str(),
        ]
    }
}

/// Play-count bucket relative to the analysed table
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PerformanceCategory {
    High,
    Medium,
    Low,
}

impl PerformanceCategory {
    pub const ALL: [PerformanceCategory; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Classify a play count against table thresholds
    ///
    /// Strictly above p75 is High, strictly above p25 is Medium, anything
    /// else is Low.
    pub fn classify(play_count: f64, thresholds: &Thresholds) -> Self {
        if play_count > thresholds.p75 {
            Self::High
        } else if play_count > thresholds.p25 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for PerformanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!(
                "unknown performance category '{}' (expected High, Medium or Low)",
                other
            )),
        }
    }
}

/// Engagement counters of one video, coerced to numbers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Counters {
    pub plays: f64,
    pub likes: f64,
    pub comments: f64,
    pub shares: f64,
}

/// A flat row plus its derived columns
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub row: FlatRow,
    pub counters: Counters,
    pub hashtags: Vec<String>,
    pub hashtag_count: usize,
    pub engagement_rate: f64,
    pub performance_category: PerformanceCategory,
}

impl EnrichedRow {
    /// Flat row with the derived columns appended, for persistence
    pub fn to_flat_row(&self) -> FlatRow {
        let mut row = self.row.clone();
        row.insert("hashtags".to_string(), json!(self.hashtags));
        row.insert("hashtag_count".to_string(), json!(self.hashtag_count));
        row.insert("engagement_rate".to_string(), json!(self.engagement_rate));
        row.insert(
            "performance_category".to_string(),
            json!(self.performance_category.as_str()),
        );
        row
    }
}

/// Enriched rows and the thresholds their categories were computed against
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedTable {
    pub rows: Vec<EnrichedRow>,

    /// `None` for an empty table
    pub thresholds: Option<Thresholds>,
}

impl EnrichedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Recompute thresholds and categories against the current rows
    ///
    /// Needed after any filtering: a category only means something relative
    /// to the set of rows it was computed over.
    pub fn recategorize(&mut self) {
        let plays: Vec<f64> = self.rows.iter().map(|r| r.counters.plays).collect();
        self.thresholds = compute_thresholds(&plays);

        if let Some(thresholds) = &self.thresholds {
            for row in &mut self.rows {
                row.performance_category =
                    PerformanceCategory::classify(row.counters.plays, thresholds);
            }
        }
    }

    /// Keep rows matching `predicate`; categories are left as they were
    pub fn retain<F>(&mut self, predicate: F)
    where
        F: FnMut(&EnrichedRow) -> bool,
    {
        self.rows.retain(predicate);
    }

    /// Flat table including the derived columns
    pub fn to_flat_table(&self) -> FlatTable {
        FlatTable::from_rows(self.rows.iter().map(EnrichedRow::to_flat_row).collect())
    }
}

/// Derive hashtags, engagement and performance category for every row
///
/// **Public** - main entry point for metrics derivation
///
/// # Errors
/// * `DeriveError::MissingField` - A configured field is absent from every
///   row of a non-empty table. Checked before anything is computed.
///
/// A field missing from only some rows counts as zero (or no text) for
/// those rows.
pub fn derive_metrics(
    table: &FlatTable,
    config: &DerivationConfig,
) -> Result<EnrichedTable, DeriveError> {
    if table.is_empty() {
        debug!("Empty table, nothing to derive");
        return Ok(EnrichedTable::default());
    }

    if let Some(missing) = config.fields().into_iter().find(|f| !table.has_column(f)) {
        return Err(DeriveError::MissingField(missing.to_string()));
    }

    debug!("Deriving metrics for {} rows", table.len());

    let rows = table
        .rows()
        .iter()
        .map(|row| enrich_row(row, config))
        .collect();

    let mut enriched = EnrichedTable {
        rows,
        thresholds: None,
    };
    enriched.recategorize();

    if let Some(t) = &enriched.thresholds {
        debug!("Play-count thresholds: p25={:.2}, p75={:.2}", t.p25, t.p75);
    }

    Ok(enriched)
}

/// First pass for one row; the category is provisional until `recategorize`
fn enrich_row(row: &FlatRow, config: &DerivationConfig) -> EnrichedRow {
    let counters = Counters {
        plays: numeric_cell(row.get(&config.play_count_field)),
        likes: numeric_cell(row.get(&config.like_field)),
        comments: numeric_cell(row.get(&config.comment_field)),
        shares: numeric_cell(row.get(&config.share_field)),
    };

    let hashtags = text_cell(row.get(&config.text_field))
        .map(|text| extract_hashtags(&text))
        .unwrap_or_default();

    EnrichedRow {
        row: row.clone(),
        counters,
        hashtag_count: hashtags.len(),
        hashtags,
        engagement_rate: engagement_rate(
            counters.likes,
            counters.comments,
            counters.shares,
            counters.plays,
        ),
        performance_category: PerformanceCategory::Low,
    }
}

/// Engagement rate in percent
///
/// Zero plays divide by one instead of zero. This makes a video with no
/// plays indistinguishable from one with a single play.
pub fn engagement_rate(likes: f64, comments: f64, shares: f64, plays: f64) -> f64 {
    let denom = if plays != 0.0 { plays } else { 1.0 };
    (likes + comments + shares) / denom * 100.0
}

/// Percentile `q` (0.0..=1.0) with linear interpolation between closest ranks
///
/// Returns `None` for an empty slice.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let position = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

fn compute_thresholds(plays: &[f64]) -> Option<Thresholds> {
    Some(Thresholds {
        p25: percentile(plays, 0.25)?,
        p75: percentile(plays, 0.75)?,
    })
}

/// Coerce a cell to a number
///
/// Missing, null and non-numeric cells are zero, and so are text cells that
/// only parse to a non-finite value (`"NaN"`, `"inf"`).
pub fn numeric_cell(value: Option<&Value>) -> f64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Read a cell as text; missing, null and structured cells have none
pub fn text_cell(value: Option<&Value>) -> Option<Cow<'_, str>> {
    match value {
        Some(Value::String(s)) => Some(Cow::Borrowed(s.as_str())),
        Some(Value::Number(n)) => Some(Cow::Owned(n.to_string())),
        Some(Value::Bool(b)) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(rows: Vec<Value>) -> FlatTable {
        FlatTable::from_rows(
            rows.into_iter()
                .map(|v| match v {
                    Value::Object(map) => map,
                    _ => panic!("fixture must be an object"),
                })
                .collect(),
        )
    }

    fn top_level_config() -> DerivationConfig {
        DerivationConfig {
            play_count_field: "playCount".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_engagement_rate() {
        assert_eq!(engagement_rate(10.0, 2.0, 1.0, 100.0), 13.0);
        assert_eq!(engagement_rate(3.0, 0.0, 0.0, 0.0), 300.0);
        assert_eq!(engagement_rate(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let values: Vec<f64> = (1..=100).map(f64::from).collect();
        assert_eq!(percentile(&values, 0.25), Some(25.75));
        assert_eq!(percentile(&values, 0.75), Some(75.25));
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 1.0), Some(100.0));
    }

    #[test]
    fn test_percentile_edge_cases() {
        assert_eq!(percentile(&[], 0.5), None);
        assert_eq!(percentile(&[7.0], 0.75), Some(7.0));
        assert_eq!(percentile(&[4.0, 2.0], 0.5), Some(3.0));
    }

    #[test]
    fn test_classify_is_strict() {
        let t = Thresholds { p25: 10.0, p75: 20.0 };
        assert_eq!(PerformanceCategory::classify(20.5, &t), PerformanceCategory::High);
        assert_eq!(PerformanceCategory::classify(20.0, &t), PerformanceCategory::Medium);
        assert_eq!(PerformanceCategory::classify(10.0, &t), PerformanceCategory::Low);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("high".parse::<PerformanceCategory>(), Ok(PerformanceCategory::High));
        assert_eq!(" LOW ".parse::<PerformanceCategory>(), Ok(PerformanceCategory::Low));
        assert!("huge".parse::<PerformanceCategory>().is_err());
    }

    #[test]
    fn test_numeric_cell_coercion() {
        assert_eq!(numeric_cell(Some(&json!(12))), 12.0);
        assert_eq!(numeric_cell(Some(&json!("12.5"))), 12.5);
        assert_eq!(numeric_cell(Some(&json!("n/a"))), 0.0);
        assert_eq!(numeric_cell(Some(&Value::Null)), 0.0);
        assert_eq!(numeric_cell(None), 0.0);
    }

    #[test]
    fn test_non_finite_text_counts_as_zero() {
        assert_eq!(numeric_cell(Some(&json!("NaN"))), 0.0);
        assert_eq!(numeric_cell(Some(&json!("inf"))), 0.0);
        assert_eq!(numeric_cell(Some(&json!("-infinity"))), 0.0);
    }

    #[test]
    fn test_non_finite_plays_do_not_poison_thresholds() {
        let rows: Vec<Value> = ["NaN", "10", "1000"]
            .iter()
            .map(|plays| json!({
                "desc": "", "playCount": plays, "stats_diggCount": "inf",
                "stats_commentCount": 1, "stats_shareCount": 0
            }))
            .collect();

        let enriched = derive_metrics(&table(rows), &top_level_config()).unwrap();
        let thresholds = enriched.thresholds.unwrap();

        assert_eq!(enriched.rows[0].counters.plays, 0.0);
        assert_eq!(enriched.rows[0].engagement_rate, 100.0);
        assert!(enriched.rows.iter().all(|r| r.engagement_rate.is_finite()));
        assert_eq!(thresholds.p25, 5.0);
        assert_eq!(thresholds.p75, 505.0);
        assert_eq!(enriched.rows[2].performance_category, PerformanceCategory::High);

        // Every f64 must survive a JSON round trip
        let report = crate::aggregator::build_report(&enriched, "author_uniqueId", 5);
        let text = serde_json::to_string(&report).unwrap();
        let parsed: crate::parser::schema::InsightsReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_derive_single_row() {
        let t = table(vec![json!({
            "desc": "#fun #dance",
            "stats_diggCount": 10,
            "stats_commentCount": 2,
            "stats_shareCount": 1,
            "playCount": 100
        })]);

        let enriched = derive_metrics(&t, &top_level_config()).unwrap();
        let row = &enriched.rows[0];

        assert_eq!(row.hashtags, vec!["fun", "dance"]);
        assert_eq!(row.hashtag_count, 2);
        assert_eq!(row.engagement_rate, 13.0);
        // A single row sits on both thresholds
        assert_eq!(row.performance_category, PerformanceCategory::Low);
    }

    #[test]
    fn test_missing_field_in_every_row() {
        let t = table(vec![json!({"desc": "x", "playCount": 1})]);

        let err = derive_metrics(&t, &top_level_config()).unwrap_err();
        assert_eq!(err, DeriveError::MissingField("stats_diggCount".to_string()));
    }

    #[test]
    fn test_field_missing_from_some_rows_counts_as_zero() {
        let t = table(vec![
            json!({"desc": "#a", "playCount": 10, "stats_diggCount": 5,
                   "stats_commentCount": 0, "stats_shareCount": 0}),
            json!({"playCount": 0}),
        ]);

        let enriched = derive_metrics(&t, &top_level_config()).unwrap();

        assert_eq!(enriched.rows[1].hashtags, Vec::<String>::new());
        assert_eq!(enriched.rows[1].engagement_rate, 0.0);
        assert_eq!(enriched.rows[0].engagement_rate, 50.0);
    }

    #[test]
    fn test_null_text_yields_no_hashtags() {
        let t = table(vec![json!({
            "desc": null, "playCount": 1, "stats_diggCount": 0,
            "stats_commentCount": 0, "stats_shareCount": 0
        })]);

        let enriched = derive_metrics(&t, &top_level_config()).unwrap();
        assert_eq!(enriched.rows[0].hashtag_count, 0);
    }

    #[test]
    fn test_empty_table() {
        let enriched = derive_metrics(&FlatTable::new(), &DerivationConfig::default()).unwrap();
        assert!(enriched.is_empty());
        assert!(enriched.thresholds.is_none());
    }

    #[test]
    fn test_recategorize_after_retain() {
        let rows: Vec<Value> = (1..=8)
            .map(|n| json!({
                "desc": "", "playCount": n, "stats_diggCount": 0,
                "stats_commentCount": 0, "stats_shareCount": 0
            }))
            .collect();
        let mut enriched = derive_metrics(&table(rows), &top_level_config()).unwrap();
        assert_eq!(enriched.rows[3].performance_category, PerformanceCategory::Medium);

        enriched.retain(|r| r.counters.plays <= 4.0);
        enriched.recategorize();

        assert_eq!(enriched.rows[3].performance_category, PerformanceCategory::High);
    }

    #[test]
    fn test_to_flat_row_appends_derived_columns() {
        let t = table(vec![json!({
            "desc": "#x", "playCount": 1, "stats_diggCount": 1,
            "stats_commentCount": 0, "stats_shareCount": 0
        })]);
        let enriched = derive_metrics(&t, &top_level_config()).unwrap();

        let flat = enriched.to_flat_table();
        let columns = flat.columns();
        let tail = &columns[columns.len() - 4..];

        assert_eq!(
            tail,
            &["hashtags", "hashtag_count", "engagement_rate", "performance_category"]
        );
        assert_eq!(flat.rows()[0]["hashtags"], json!(["x"]));
    }
}
