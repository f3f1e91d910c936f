//! Configuration and constants for the CLI.

use super::error::ConfigError;
use crate::aggregator::DerivationConfig;
use crate::flatten::FlattenConfig;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current insights report schema version
pub const REPORT_VERSION: &str = "1.0.0";

// Fields of an exported video record that hold objects.
// Some of them are dropped entirely (see SKIPPED_FIELDS).
pub const NESTED_FIELDS: &[&str] = &[
    "author",
    "authorStats",
    "authorStatsV2",
    "music",
    "video",
    "stats",
    "statsV2",
    "challenges",
    "backendSourceEventTracking",
    "contents",
    "item_control",
    "textExtra",
    "videoSuggestWordsList",
];
pub const SKIPPED_FIELDS: &[&str] = &[
    "challenges",
    "backendSourceEventTracking",
    "contents",
    "item_control",
    "textExtra",
    "videoSuggestWordsList",
];

// Column names produced by flattening the default nested fields
pub const DEFAULT_TEXT_FIELD: &str = "desc";
pub const DEFAULT_PLAY_COUNT_FIELD: &str = "stats_playCount";
pub const DEFAULT_LIKE_FIELD: &str = "stats_diggCount";
pub const DEFAULT_COMMENT_FIELD: &str = "stats_commentCount";
pub const DEFAULT_SHARE_FIELD: &str = "stats_shareCount";
pub const DEFAULT_CREATOR_FIELD: &str = "author_uniqueId";

/// Default number of entries in ranked lists (hashtags, creators)
pub const DEFAULT_TOP_N: usize = 10;

// Keys under which an export may wrap its record array
pub const RECORD_LIST_FIELD_NAMES: &[&str] = &["itemList", "items", "videos", "data"];

/// Dashboard aggregation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Column identifying the creator of a video
    pub creator_field: String,

    /// Length of ranked lists
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            creator_field: DEFAULT_CREATOR_FIELD.to_string(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// Complete application configuration
///
/// Every section is optional in the TOML file; missing values fall back
/// to the defaults above.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub flatten: FlattenConfig,
    pub derive: DerivationConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// * `ConfigError::IoError` - If file cannot be read
    /// * `ConfigError::ParseFailed` - If TOML is invalid
    /// * `ConfigError::Invalid` - If a value is out of range
    ///
    /// # Example
    /// ```ignore
    /// let config = AppConfig::load("vidstats.toml")?;
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dashboard.top_n == 0 {
            return Err(ConfigError::Invalid(
                "dashboard.top_n must be greater than 0".to_string(),
            ));
        }

        let derive = &self.derive;
        for (name, value) in [
            ("text_field", &derive.text_field),
            ("play_count_field", &derive.play_count_field),
            ("like_field", &derive.like_field),
            ("comment_field", &derive.comment_field),
            ("share_field", &derive.share_field),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("derive.{} cannot be empty", name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_matches_constants() {
        let config = AppConfig::default();
        assert_eq!(config.flatten.nested_fields.len(), NESTED_FIELDS.len());
        assert!(config.flatten.skip_fields.contains("textExtra"));
        assert_eq!(config.derive.play_count_field, DEFAULT_PLAY_COUNT_FIELD);
        assert_eq!(config.dashboard.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[derive]\nplay_count_field = \"playCount\"\n\n[dashboard]\ntop_n = 3"
        )
        .unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.derive.play_count_field, "playCount");
        assert_eq!(config.derive.like_field, DEFAULT_LIKE_FIELD);
        assert_eq!(config.dashboard.top_n, 3);
        assert_eq!(config.flatten, FlattenConfig::default());
    }

    #[test]
    fn test_load_rejects_zero_top_n() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[dashboard]\ntop_n = 0").unwrap();

        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[derive\nnope").unwrap();

        assert!(matches!(
            AppConfig::load(file.path()),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_load_or_default_without_path() {
        let config = AppConfig::load_or_default(None).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
