//! Flat table: ordered rows plus the union of their columns.

use crate::parser::schema::FlatRow;
use serde_json::Value;
use std::collections::HashSet;

/// Ordered sequence of flat rows
///
/// Row `i` corresponds to input record `i`. Columns are the union of all
/// row keys in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatTable {
    rows: Vec<FlatRow>,
    columns: Vec<String>,
}

impl FlatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table with a preset column order, e.g. a persisted header
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            rows: Vec::new(),
            columns,
        }
    }

    /// Build a table from rows, computing the column union
    pub fn from_rows(rows: Vec<FlatRow>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Append a row, registering any column not seen before
    pub fn push_row(&mut self, row: FlatRow) {
        let known: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        let new_columns: Vec<String> = row
            .keys()
            .filter(|key| !known.contains(key.as_str()))
            .cloned()
            .collect();

        self.columns.extend(new_columns);
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<FlatRow> {
        self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if `column` is part of the table
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Cells of row `index` aligned with `columns()`; missing cells are `None`
    pub fn materialize_row(&self, index: usize) -> Option<Vec<Option<&Value>>> {
        let row = self.rows.get(index)?;
        Some(self.columns.iter().map(|column| row.get(column)).collect())
    }
}
