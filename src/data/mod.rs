//! Data parsing and handling module
//!
//! This module provides the import pipeline (delimited text and spreadsheet
//! documents), the project persistence codec, and the derived-column engine
//! that operate on a [`DataTable`](crate::data_table::DataTable).
//!
//! ## Error Handling
//!
//! All data operations return `DataResult<T>` which uses the `DataError` type.
//! Common errors include:
//! - `HostUnavailable` / `OpenFailed`: Spreadsheet reader failures
//! - `NoRows` / `NoPressureColumn`: Derived-column preconditions
//! - `Io`/`Json`: File system and parse errors

mod csv_parser;
mod derived;
mod encoding;
mod error;
mod json_parser;
mod spreadsheet;

pub use csv_parser::*;
pub use derived::*;
pub use encoding::*;
pub use error::*;
pub use json_parser::*;
pub use spreadsheet::*;
