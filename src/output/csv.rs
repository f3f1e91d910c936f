//! CSV table persistence.
//!
//! The header is the table's column union. Missing cells are written empty,
//! lists and objects as JSON text. Reading reverses this as far as a
//! text format allows: a cell comes back as a number, boolean, list or
//! object only if that value renders to exactly the same text, named text
//! columns are always strings, and empty cells become absent keys.

use super::{calculate_file_size, ensure_parent_dir, validate_path};
use crate::flatten::FlatTable;
use crate::parser::schema::FlatRow;
use crate::utils::error::OutputError;
use log::{debug, info, warn};
use serde_json::{Number, Value};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Result of a best-effort persistence attempt
///
/// The in-memory table is valid either way; this only tells the caller
/// whether it also reached disk.
#[derive(Debug, Clone, PartialEq)]
pub enum PersistOutcome {
    Persisted { path: PathBuf, rows: usize },
    Failed { path: PathBuf, reason: String },
}

impl PersistOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Self::Persisted { .. })
    }
}

/// Write a table to a CSV file
///
/// **Public** - main entry point for CSV output
///
/// # Returns
/// Number of data rows written
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory, or its parent cannot be created
/// * `OutputError::WriteFailed` / `OutputError::CsvFailed` - I/O error during write
pub fn write_table_csv(
    table: &FlatTable,
    output_path: impl AsRef<Path>,
) -> Result<usize, OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing table to: {}", output_path.display());

    validate_path(output_path)?;
    ensure_parent_dir(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let rows = write_table_to(table, BufWriter::new(file))?;

    info!(
        "Table written successfully ({} rows, {} columns, {} bytes)",
        rows,
        table.columns().len(),
        calculate_file_size(output_path)
    );

    Ok(rows)
}

/// Write a table as CSV to any writer
pub fn write_table_to<W: Write>(table: &FlatTable, writer: W) -> Result<usize, OutputError> {
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    // A header with no columns would be an empty record, which csv rejects
    if table.columns().is_empty() {
        csv_writer.flush()?;
        return Ok(0);
    }

    csv_writer.write_record(table.columns())?;

    for index in 0..table.len() {
        let cells = table.materialize_row(index).unwrap_or_default();
        csv_writer.write_record(cells.into_iter().map(render_cell))?;
    }

    csv_writer.flush()?;
    Ok(table.len())
}

/// Persist a table without letting failure escape
///
/// **Public** - used by commands that keep working on the in-memory table
pub fn persist(table: &FlatTable, output_path: impl AsRef<Path>) -> PersistOutcome {
    let path = output_path.as_ref().to_path_buf();

    match write_table_csv(table, &path) {
        Ok(rows) => PersistOutcome::Persisted { path, rows },
        Err(e) => {
            warn!("Could not persist table to {}: {}", path.display(), e);
            PersistOutcome::Failed {
                path,
                reason: e.to_string(),
            }
        }
    }
}

/// Read a table from a CSV file
///
/// **Public** - used by the analyze command
///
/// # Arguments
/// * `input_path` - CSV file written by `write_table_csv`
/// * `text_columns` - Columns read back verbatim as strings (caption, creator)
///
/// # Errors
/// * `OutputError::ReadFailed` - File cannot be opened
/// * `OutputError::CsvFailed` - File is not valid CSV
pub fn read_table_csv(
    input_path: impl AsRef<Path>,
    text_columns: &[&str],
) -> Result<FlatTable, OutputError> {
    let input_path = input_path.as_ref();

    info!("Reading table from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let table = read_table_from(file, text_columns)?;

    debug!(
        "Table loaded: {} rows, {} columns",
        table.len(),
        table.columns().len()
    );

    Ok(table)
}

/// Read a CSV table from any reader
pub fn read_table_from<R: Read>(
    reader: R,
    text_columns: &[&str],
) -> Result<FlatTable, OutputError> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let verbatim: Vec<bool> = headers
        .iter()
        .map(|h| text_columns.contains(&h.as_str()))
        .collect();
    let mut table = FlatTable::with_columns(headers.clone());

    for record in csv_reader.records() {
        let record = record?;
        let mut row = FlatRow::new();

        for ((column, is_text), cell) in headers.iter().zip(&verbatim).zip(record.iter()) {
            if cell.is_empty() {
                continue;
            }
            let value = if *is_text {
                Value::String(cell.to_string())
            } else {
                parse_cell(cell)
            };
            row.insert(column.clone(), value);
        }

        table.push_row(row);
    }

    Ok(table)
}

/// Text form of a cell; absent and null cells are empty
fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(structured) => structured.to_string(),
    }
}

/// Typed value of a CSV cell, when the cell is exactly how that value renders
///
/// A cell only becomes a number, boolean, list or object if `render_cell`
/// would write it back unchanged; `"0123"`, `"1e3"` or `"[1, 2]"` stay text.
fn parse_cell(cell: &str) -> Value {
    let number = cell
        .parse::<i64>()
        .ok()
        .map(Number::from)
        .or_else(|| cell.parse::<u64>().ok().map(Number::from))
        .or_else(|| cell.parse::<f64>().ok().and_then(Number::from_f64));

    let typed = match number {
        Some(n) => Some(Value::Number(n)),
        None => match cell {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ if cell.starts_with('[') || cell.starts_with('{') => {
                serde_json::from_str::<Value>(cell).ok()
            }
            _ => None,
        },
    };

    typed
        .filter(|value| render_cell(Some(value)) == cell)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}
