//! Error types for data operations
//!
//! Provides unified error handling for importing, editing and deriving
//! columns.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during data operations
#[derive(Error, Debug)]
pub enum DataError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// No spreadsheet engine can be reached on this host
    #[error(
        "No spreadsheet engine available to read .xls/.xlsx files. \
         Install a spreadsheet application or re-save the file as delimited text (CSV)."
    )]
    HostUnavailable,

    /// The spreadsheet document could not be opened
    #[error("Cannot open spreadsheet '{}': {reason}", path.display())]
    OpenFailed { path: PathBuf, reason: String },

    /// The grid holds no rows to compute from
    #[error("No data")]
    NoRows,

    /// Neither a Pressure-typed column nor a pressure-like header exists
    #[error("No pressure column found; define column types first")]
    NoPressureColumn,

    /// A configured source column does not exist
    #[error("Column {index} is out of range ({count} columns)")]
    ColumnOutOfRange { index: usize, count: usize },

    /// A cell address does not exist
    #[error("Cell ({row}, {column}) is out of range")]
    CellOutOfRange { row: usize, column: usize },
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;
