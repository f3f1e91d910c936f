//! Hashtag extraction from free-text captions.

use regex::Regex;
use std::sync::LazyLock;

static HASHTAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("invalid regex"));

/// Extract hashtags from a caption, in order of appearance
///
/// A hashtag is `#` followed by one or more word characters (letters,
/// digits, underscore). The leading `#` is not part of the result.
///
/// # Example
/// ```
/// use vidstats::aggregator::extract_hashtags;
///
/// assert_eq!(extract_hashtags("love #cat #dog!"), vec!["cat", "dog"]);
/// ```
pub fn extract_hashtags(text: &str) -> Vec<String> {
    HASHTAG_REGEX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
