//! vidstats
//!
//! Flattening and engagement analytics for short-video platform exports.
//!
//! The pipeline has three stages:
//! - [`flatten`] turns nested video records into a flat, column-ordered table
//! - [`aggregator`] derives hashtags, engagement rate and performance
//!   category per video, then dashboard aggregates over a table
//! - [`dashboard`] selects the rows a viewer asked for
//!
//! [`output`] persists tables as CSV and reports as JSON; [`commands`] wires
//! the stages together for the `vidstats` binary.
//!
//! ## Getting Started
//!
//! ```bash
//! vidstats run --input export.json --table videos.csv --summary
//! vidstats analyze --input videos.csv --hashtag dance --category High
//! ```

pub mod aggregator;
pub mod commands;
pub mod dashboard;
pub mod flatten;
pub mod output;
pub mod parser;
pub mod utils;
