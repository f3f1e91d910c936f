//! One-level flattening of exported records.
//!
//! Nested fields are promoted into `<field>_<innerKey>` columns, skipped
//! nested fields vanish, everything else passes through untouched.
//!
//! Example: `{"author": {"nickname": "a"}, "desc": "hi"}` becomes
//! `{"author_nickname": "a", "desc": "hi"}`.

use super::table::FlatTable;
use crate::parser::records::value_kind;
use crate::parser::schema::{FlatRow, RawRecord};
use crate::utils::config::{NESTED_FIELDS, SKIPPED_FIELDS};
use crate::utils::error::FlattenError;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Which fields are nested and which nested fields are dropped
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlattenConfig {
    /// Fields whose value is an object to promote one level
    pub nested_fields: BTreeSet<String>,

    /// Nested fields to drop entirely
    pub skip_fields: BTreeSet<String>,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self::new(NESTED_FIELDS.iter().copied(), SKIPPED_FIELDS.iter().copied())
    }
}

impl FlattenConfig {
    pub fn new<N, S>(nested: N, skip: S) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        Self {
            nested_fields: nested.into_iter().map(Into::into).collect(),
            skip_fields: skip.into_iter().map(Into::into).collect(),
        }
    }

    fn is_nested(&self, field: &str) -> bool {
        self.nested_fields.contains(field)
    }

    fn is_skipped(&self, field: &str) -> bool {
        self.skip_fields.contains(field)
    }
}

/// Flatten a batch of records into a table
///
/// **Public** - main entry point for flattening
///
/// # Returns
/// One row per record, in input order
///
/// # Errors
/// * `FlattenError::MalformedNestedField` - A nested field does not hold an
///   object. The whole batch is rejected.
pub fn flatten(records: &[RawRecord], config: &FlattenConfig) -> Result<FlatTable, FlattenError> {
    debug!("Flattening {} records", records.len());

    let mut table = FlatTable::new();
    for (index, record) in records.iter().enumerate() {
        table.push_row(flatten_indexed(index, record, config)?);
    }

    debug!("Flattened table has {} columns", table.columns().len());

    Ok(table)
}

/// Flatten a single record
///
/// **Public** - single-record form of `flatten`
pub fn flatten_record(record: &RawRecord, config: &FlattenConfig) -> Result<FlatRow, FlattenError> {
    flatten_indexed(0, record, config)
}

fn flatten_indexed(
    index: usize,
    record: &RawRecord,
    config: &FlattenConfig,
) -> Result<FlatRow, FlattenError> {
    let mut row = FlatRow::new();

    for (field, value) in record {
        if !config.is_nested(field) {
            row.insert(field.clone(), value.clone());
            continue;
        }

        if config.is_skipped(field) {
            continue;
        }

        let Value::Object(inner) = value else {
            return Err(FlattenError::MalformedNestedField {
                index,
                field: field.clone(),
                found: value_kind(value),
            });
        };

        for (inner_key, inner_value) in inner {
            row.insert(format!("{}_{}", field, inner_key), inner_value.clone());
        }
    }

    Ok(row)
}

/// Regroup promoted columns back into nested objects
///
/// A key is collected under the longest nested field `f` such that the key
/// starts with `f_`; all other keys pass through. Nested field names may
/// themselves contain `_` (e.g. `item_control`). Inverse of `flatten` for
/// every promoted field.
pub fn renest(row: &FlatRow, nested_fields: &BTreeSet<String>) -> RawRecord {
    let mut record = RawRecord::new();

    for (key, value) in row {
        match split_promoted(key, nested_fields) {
            Some((prefix, inner_key)) => {
                let entry = record
                    .entry(prefix.to_string())
                    .or_insert_with(|| Value::Object(serde_json::Map::new()));
                if let Value::Object(inner) = entry {
                    inner.insert(inner_key.to_string(), value.clone());
                }
            }
            None => {
                record.insert(key.clone(), value.clone());
            }
        }
    }

    record
}

/// Split a promoted key into its nested field and inner key
fn split_promoted<'a>(
    key: &'a str,
    nested_fields: &'a BTreeSet<String>,
) -> Option<(&'a str, &'a str)> {
    nested_fields
        .iter()
        .filter_map(|field| {
            let inner_key = key.strip_prefix(field.as_str())?.strip_prefix('_')?;
            Some((field.as_str(), inner_key))
        })
        .max_by_key(|(field, _)| field.len())
}
