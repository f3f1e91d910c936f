//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while loading raw records
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to read input: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid export format: {0}")]
    InvalidFormat(String),
}

/// Errors that can occur while flattening records
#[derive(Error, Debug, PartialEq)]
pub enum FlattenError {
    #[error("Record {index}: nested field '{field}' holds {found}, expected an object")]
    MalformedNestedField {
        index: usize,
        field: String,
        found: &'static str,
    },
}

/// Errors that can occur while deriving metrics
#[derive(Error, Debug, PartialEq)]
pub enum DeriveError {
    #[error("Configured field '{0}' is absent from every row")]
    MissingField(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to read file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading the config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
