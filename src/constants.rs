//! Application-wide constants.
//!
//! Centralizes magic numbers and naming conventions shared by the parser,
//! the grid, and the derived-column engine.

// ============================================================================
// Import & Preview
// ============================================================================

/// Number of raw text lines read for the import preview
pub const PREVIEW_MAX_LINES: usize = 50;

/// Row cap for spreadsheet previews
pub const PREVIEW_MAX_ROWS: usize = 50;

/// Column cap for spreadsheet previews
pub const PREVIEW_MAX_COLUMNS: usize = 20;

/// Prefix for synthesized header labels ("Col 1", "Col 2", ...)
pub const DEFAULT_HEADER_PREFIX: &str = "Col";

/// File extensions routed to the spreadsheet reader
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xls", "xlsx", "xlsm", "ods"];

/// File extension of persisted project tables
pub const PROJECT_EXTENSION: &str = "json";

// ============================================================================
// Timing
// ============================================================================

/// Import preview refresh debounce in milliseconds
pub const PREVIEW_DEBOUNCE_MS: u64 = 200;

/// Search filter debounce in milliseconds
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

// ============================================================================
// Columns
// ============================================================================

/// Default decimal places for a column definition
pub const DEFAULT_DECIMAL_PLACES: u32 = 3;

/// Label given to columns inserted by the user
pub const NEW_COLUMN_NAME: &str = "新列";

/// Default name for the elapsed-time column
pub const DEFAULT_TIME_COLUMN_NAME: &str = "时间";

/// Name prefix of the pressure-drop column
pub const PRESSURE_DROP_COLUMN_NAME: &str = "压降";

/// Separator between a derived column's name and its unit
pub const UNIT_SEPARATOR: &str = "\\";

/// Header fragments that identify a pressure column when no column is typed
pub const PRESSURE_HEADER_KEYWORD: &str = "压力";
pub const PRESSURE_HEADER_KEYWORD_EN: &str = "pressure";

// ============================================================================
// Derived values
// ============================================================================

/// Fixed decimals written into derived cells
pub const DERIVED_VALUE_DECIMALS: usize = 3;

/// Accepted date formats, tried in order
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Accepted time formats, tried in order (`%H` also takes one-digit hours)
pub const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];
