//! Well-test data editor core
//!
//! The non-UI half of a spreadsheet-like data-entry widget for well-test
//! engineering data:
//!
//! - [`data`]: delimited text and spreadsheet import, the project
//!   persistence codec, and the derived-column engine
//! - [`data_table`]: the editable grid with per-column metadata
//! - [`editor`]: the controller a UI shell drives
//! - [`import_preview`]: state behind the import prompt
//! - [`debounce`] and [`settings`]: timing and persisted preferences

pub mod constants;
pub mod data;
pub mod data_table;
pub mod debounce;
pub mod editor;
pub mod import_preview;
pub mod settings;
pub mod types;

pub use data::{DataError, DataResult};
pub use data_table::{Column, DataTable, RowFilter};
pub use editor::{ActionAvailability, DataEditor};
pub use settings::EditorSettings;
