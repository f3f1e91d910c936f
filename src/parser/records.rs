//! Loader for exported video records.
//!
//! The acquisition script dumps whatever the platform client returned as a
//! JSON array of objects. Some tools wrap that array in an object instead,
//! so a handful of wrapper keys are recognised as well.

use super::schema::RawRecord;
use crate::utils::config::RECORD_LIST_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::{debug, info};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load raw records from an export file
///
/// **Public** - main entry point for reading exports
///
/// # Errors
/// * `ParseError::IoError` - File cannot be opened
/// * `ParseError::JsonError` - File is not valid JSON
/// * `ParseError::InvalidFormat` - JSON is not a list of objects
pub fn load_records(input_path: impl AsRef<Path>) -> Result<Vec<RawRecord>, ParseError> {
    let input_path = input_path.as_ref();

    info!("Reading records from: {}", input_path.display());

    let file = File::open(input_path)?;
    let value: Value = serde_json::from_reader(BufReader::new(file))?;

    let records = parse_records(value)?;
    info!("Loaded {} records", records.len());

    Ok(records)
}

/// Convert a parsed JSON document into raw records
///
/// **Public** - used by `load_records` and by tests with inline fixtures
pub fn parse_records(value: Value) -> Result<Vec<RawRecord>, ParseError> {
    let items = match value {
        Value::Array(items) => items,

        Value::Object(mut obj) => {
            let key = RECORD_LIST_FIELD_NAMES
                .iter()
                .find(|key| obj.get(**key).is_some_and(Value::is_array))
                .ok_or_else(|| {
                    ParseError::InvalidFormat(format!(
                        "Object export must hold a record array under one of: {}",
                        RECORD_LIST_FIELD_NAMES.join(", ")
                    ))
                })?;

            debug!("Export wraps records under '{}'", key);

            match obj.remove(*key) {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }

        other => {
            return Err(ParseError::InvalidFormat(format!(
                "Export must be a JSON array or object, found {}",
                value_kind(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record),
            other => Err(ParseError::InvalidFormat(format!(
                "Record {} is {}, expected an object",
                index,
                value_kind(&other)
            ))),
        })
        .collect()
}

/// Short description of a JSON value's type, for error messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
