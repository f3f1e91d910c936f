//! Dashboard aggregates over an enriched table.
//!
//! Every aggregate is computed over whatever table is passed in, usually the
//! filtered subset on display. Over an empty table the scalar aggregates are
//! `None` and the lists are empty.

use super::metrics::{text_cell, EnrichedRow, EnrichedTable, PerformanceCategory};
use crate::parser::schema::{
    CategoryStats, CreatorStats, HashtagStats, InsightsReport, Kpis,
};
use crate::utils::config::REPORT_VERSION;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Running sum and count for a mean
#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Headline numbers
pub fn calculate_kpis(table: &EnrichedTable) -> Kpis {
    let mut kpis = Kpis {
        video_count: table.len(),
        ..Default::default()
    };
    let mut engagement = Mean::default();
    let mut hashtags = Mean::default();

    for row in &table.rows {
        kpis.total_plays += row.counters.plays;
        kpis.total_likes += row.counters.likes;
        kpis.total_comments += row.counters.comments;
        kpis.total_shares += row.counters.shares;
        engagement.add(row.engagement_rate);
        hashtags.add(row.hashtag_count as f64);
    }

    kpis.avg_engagement_rate = engagement.value();
    kpis.avg_hashtags_per_video = hashtags.value();
    kpis
}

/// Hashtag count with the highest mean engagement rate
///
/// Ties go to the smaller count.
pub fn optimal_hashtag_count(table: &EnrichedTable) -> Option<usize> {
    let mut groups: BTreeMap<usize, Mean> = BTreeMap::new();
    for row in &table.rows {
        groups.entry(row.hashtag_count).or_default().add(row.engagement_rate);
    }

    argmax(groups)
}

/// Performance category with the highest mean engagement rate
///
/// Ties go to the higher category.
pub fn best_category(table: &EnrichedTable) -> Option<PerformanceCategory> {
    let mut groups: BTreeMap<PerformanceCategory, Mean> = BTreeMap::new();
    for row in &table.rows {
        groups
            .entry(row.performance_category)
            .or_default()
            .add(row.engagement_rate);
    }

    argmax(groups)
}

/// First key (in map order) with the strictly greatest mean
fn argmax<K: Copy>(groups: BTreeMap<K, Mean>) -> Option<K> {
    let mut best: Option<(K, f64)> = None;

    for (key, mean) in groups {
        let Some(value) = mean.value() else {
            continue;
        };
        if best.map_or(true, |(_, current)| value > current) {
            best = Some((key, value));
        }
    }

    best.map(|(key, _)| key)
}

/// Per-category video count, mean engagement and mean plays
///
/// Only categories that occur in the table are listed, High first.
pub fn engagement_distribution(table: &EnrichedTable) -> Vec<CategoryStats> {
    PerformanceCategory::ALL
        .iter()
        .filter_map(|category| {
            let rows: Vec<&EnrichedRow> = table
                .rows
                .iter()
                .filter(|r| r.performance_category == *category)
                .collect();
            if rows.is_empty() {
                return None;
            }

            let count = rows.len() as f64;
            Some(CategoryStats {
                category: *category,
                video_count: rows.len(),
                avg_engagement_rate: rows.iter().map(|r| r.engagement_rate).sum::<f64>() / count,
                avg_plays: rows.iter().map(|r| r.counters.plays).sum::<f64>() / count,
            })
        })
        .collect()
}

/// Most frequent hashtags (case-insensitive), with plays and engagement
///
/// A hashtag used twice in one caption counts twice.
pub fn hashtag_analysis(table: &EnrichedTable, top_n: usize) -> Vec<HashtagStats> {
    let mut stats: HashMap<String, (usize, f64, Mean)> = HashMap::new();

    for row in &table.rows {
        for tag in &row.hashtags {
            let entry = stats.entry(tag.to_lowercase()).or_default();
            entry.0 += 1;
            entry.1 += row.counters.plays;
            entry.2.add(row.engagement_rate);
        }
    }

    let mut ranked: Vec<HashtagStats> = stats
        .into_iter()
        .map(|(hashtag, (occurrences, total_plays, engagement))| HashtagStats {
            hashtag,
            occurrences,
            total_plays,
            avg_engagement_rate: engagement.value().unwrap_or(0.0),
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.hashtag.cmp(&b.hashtag))
    });
    ranked.truncate(top_n);
    ranked
}

/// Creators ranked by total plays
///
/// Rows with no value in `creator_field` are ignored.
pub fn creator_rankings(
    table: &EnrichedTable,
    creator_field: &str,
    top_n: usize,
) -> Vec<CreatorStats> {
    let mut stats: HashMap<String, CreatorStats> = HashMap::new();
    let mut engagement: HashMap<String, Mean> = HashMap::new();

    for row in &table.rows {
        let Some(creator) = text_cell(row.row.get(creator_field)) else {
            continue;
        };
        let creator = creator.into_owned();

        let entry = stats.entry(creator.clone()).or_insert_with(|| CreatorStats {
            creator: creator.clone(),
            video_count: 0,
            total_plays: 0.0,
            total_likes: 0.0,
            avg_engagement_rate: 0.0,
        });
        entry.video_count += 1;
        entry.total_plays += row.counters.plays;
        entry.total_likes += row.counters.likes;
        engagement.entry(creator).or_default().add(row.engagement_rate);
    }

    let mut ranked: Vec<CreatorStats> = stats
        .into_values()
        .map(|mut s| {
            s.avg_engagement_rate = engagement
                .get(&s.creator)
                .and_then(Mean::value)
                .unwrap_or(0.0);
            s
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_plays
            .total_cmp(&a.total_plays)
            .then_with(|| a.creator.cmp(&b.creator))
    });
    ranked.truncate(top_n);
    ranked
}

/// Build the full insights report
///
/// **Public** - main entry point for dashboard aggregation
pub fn build_report(table: &EnrichedTable, creator_field: &str, top_n: usize) -> InsightsReport {
    use chrono::Utc;

    debug!("Aggregating insights over {} rows", table.len());

    InsightsReport {
        version: REPORT_VERSION.to_string(),
        kpis: calculate_kpis(table),
        optimal_hashtag_count: optimal_hashtag_count(table),
        best_category: best_category(table),
        thresholds: table.thresholds,
        engagement_distribution: engagement_distribution(table),
        top_hashtags: hashtag_analysis(table, top_n),
        top_creators: creator_rankings(table, creator_field, top_n),
        generated_at: Utc::now().to_rfc3339(),
    }
}

impl InsightsReport {
    /// Get human-readable summary
    ///
    /// **Public** - for the `--summary` flag and logging
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        let k = &self.kpis;

        lines.push(format!(
            "Videos: {} | Plays: {:.0} | Likes: {:.0} | Comments: {:.0} | Shares: {:.0}",
            k.video_count, k.total_plays, k.total_likes, k.total_comments, k.total_shares
        ));
        lines.push(format!(
            "Avg engagement: {} | Avg hashtags/video: {}",
            fmt_opt(k.avg_engagement_rate, "%"),
            fmt_opt(k.avg_hashtags_per_video, "")
        ));

        if let Some(t) = &self.thresholds {
            lines.push(format!("Play thresholds: p25={:.2} p75={:.2}", t.p25, t.p75));
        }

        lines.push(format!(
            "Optimal hashtag count: {} | Best category: {}",
            self.optimal_hashtag_count
                .map_or_else(|| "n/a".to_string(), |n| n.to_string()),
            self.best_category
                .map_or_else(|| "n/a".to_string(), |c| c.to_string())
        ));

        if !self.engagement_distribution.is_empty() {
            lines.push(String::new());
            lines.push("Engagement by category:".to_string());
            for c in &self.engagement_distribution {
                lines.push(format!(
                    "  {:<6} {:>5} videos  {:>8.2}%  {:>12.0} avg plays",
                    c.category.as_str(),
                    c.video_count,
                    c.avg_engagement_rate,
                    c.avg_plays
                ));
            }
        }

        if !self.top_hashtags.is_empty() {
            lines.push(String::new());
            lines.push("Top hashtags:".to_string());
            for (i, h) in self.top_hashtags.iter().enumerate() {
                lines.push(format!(
                    "  {}. #{} ({} uses, {:.2}%)",
                    i + 1,
                    h.hashtag,
                    h.occurrences,
                    h.avg_engagement_rate
                ));
            }
        }

        if !self.top_creators.is_empty() {
            lines.push(String::new());
            lines.push("Top creators:".to_string());
            for (i, c) in self.top_creators.iter().enumerate() {
                lines.push(format!(
                    "  {}. {} ({} videos, {:.0} plays)",
                    i + 1,
                    c.creator,
                    c.video_count,
                    c.total_plays
                ));
            }
        }

        lines.join("\n")
    }
}

fn fmt_opt(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}{}", v, unit))
}
