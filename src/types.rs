//! Core types for the well-test data editor.
//!
//! This module defines the value objects shared by the parser, the grid and
//! the derived-column engine: column metadata, import configuration, time
//! conversion configuration, derived-column results and editor events.

use crate::constants::{
    DEFAULT_DECIMAL_PLACES, DEFAULT_TIME_COLUMN_NAME, DERIVED_VALUE_DECIMALS, PROJECT_EXTENSION,
    SPREADSHEET_EXTENSIONS, UNIT_SEPARATOR,
};
use crate::data::DataResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// Column Metadata
// ============================================================================

/// Physical quantity held by a column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    SerialNumber,
    Date,
    Time,
    TimeOfDay,
    Pressure,
    Temperature,
    FlowRate,
    Depth,
    Viscosity,
    Density,
    Permeability,
    Porosity,
    WellRadius,
    SkinFactor,
    Distance,
    Volume,
    PressureDrop,
    #[default]
    Custom,
}

/// Column metadata: header label, semantic type, unit and formatting hints
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Display label, also used as the header text
    pub name: String,
    /// Physical quantity this column holds
    pub column_type: ColumnType,
    /// Free-text unit label ("h", "MPa", ...)
    pub unit: String,
    /// Informational only; nothing in the core enforces it
    pub is_required: bool,
    /// Formatting hint for displayed values
    pub decimal_places: u32,
}

impl Default for ColumnDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            column_type: ColumnType::Custom,
            unit: String::new(),
            is_required: false,
            decimal_places: DEFAULT_DECIMAL_PLACES,
        }
    }
}

impl ColumnDefinition {
    /// A Custom column with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }
}

// ============================================================================
// Import Settings
// ============================================================================

/// Text encoding used to decode delimited files
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncodingSelector {
    /// Host locale encoding, UTF-8 when none resolves
    #[default]
    Auto,
    Utf8,
    /// GBK / GB2312 (decoded as GBK, a superset)
    Gbk,
    /// Host locale encoding, chosen explicitly
    System,
    /// ISO-8859-1
    Latin1,
}

impl EncodingSelector {
    /// Picker label; [`FromStr`] accepts it back
    pub fn label(&self) -> &'static str {
        match self {
            EncodingSelector::Auto => "Auto",
            EncodingSelector::Utf8 => "UTF-8",
            EncodingSelector::Gbk => "GBK/GB2312",
            EncodingSelector::System => "System (Local)",
            EncodingSelector::Latin1 => "ISO-8859-1",
        }
    }
}

impl FromStr for EncodingSelector {
    type Err = String;

    /// Accepts the picker labels as well as short forms ("utf8", "gbk", "latin1").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "auto" {
            Ok(EncodingSelector::Auto)
        } else if lower.starts_with("utf-8") || lower == "utf8" {
            Ok(EncodingSelector::Utf8)
        } else if lower.starts_with("gbk") || lower.starts_with("gb2312") {
            Ok(EncodingSelector::Gbk)
        } else if lower.starts_with("system") || lower == "local" {
            Ok(EncodingSelector::System)
        } else if lower.starts_with("iso") || lower == "latin1" {
            Ok(EncodingSelector::Latin1)
        } else {
            Err(format!("unknown encoding '{}'", s))
        }
    }
}

/// Field delimiter for delimited text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelimiterSelector {
    /// Tab when the first non-empty line has more tabs than commas, else comma
    #[default]
    Auto,
    Comma,
    Tab,
    Space,
    Semicolon,
}

impl DelimiterSelector {
    /// The explicit delimiter character, `None` for `Auto`
    pub fn as_char(&self) -> Option<char> {
        match self {
            DelimiterSelector::Auto => None,
            DelimiterSelector::Comma => Some(','),
            DelimiterSelector::Tab => Some('\t'),
            DelimiterSelector::Space => Some(' '),
            DelimiterSelector::Semicolon => Some(';'),
        }
    }
}

impl FromStr for DelimiterSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(DelimiterSelector::Auto),
            "comma" | "," => Ok(DelimiterSelector::Comma),
            "tab" | "\\t" | "\t" => Ok(DelimiterSelector::Tab),
            "space" | " " => Ok(DelimiterSelector::Space),
            "semicolon" | ";" => Ok(DelimiterSelector::Semicolon),
            _ => Err(format!("unknown delimiter '{}'", s)),
        }
    }
}

/// Configuration for one import action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSettings {
    pub file_path: PathBuf,
    pub encoding: EncodingSelector,
    pub delimiter: DelimiterSelector,
    /// 1-based first data line
    pub start_row: usize,
    /// 1-based header line, only consulted when `use_header` is set
    pub header_row: usize,
    pub use_header: bool,
    pub is_spreadsheet: bool,
}

impl ImportSettings {
    /// Default configuration: Auto encoding and delimiter, header on line 1,
    /// data from line 1, spreadsheet mode chosen from the file extension.
    pub fn for_path(path: impl Into<PathBuf>) -> Self {
        let file_path = path.into();
        let is_spreadsheet = is_spreadsheet_file(&file_path);
        Self {
            file_path,
            encoding: EncodingSelector::Auto,
            delimiter: DelimiterSelector::Auto,
            start_row: 1,
            header_row: 1,
            use_header: true,
            is_spreadsheet,
        }
    }

    /// Row selection rule derived from the 1-based offsets
    pub fn row_selection(&self) -> crate::data::RowSelection {
        crate::data::RowSelection::new(self.start_row, self.use_header, self.header_row)
    }
}

/// Check if a path names a spreadsheet document (.xls/.xlsx/.xlsm/.ods)
pub fn is_spreadsheet_file(path: &Path) -> bool {
    has_extension(path, SPREADSHEET_EXTENSIONS)
}

/// Check if a path names a persisted project table (.json)
pub fn is_project_file(path: &Path) -> bool {
    has_extension(path, &[PROJECT_EXTENSION])
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            extensions.iter().any(|candidate| *candidate == ext)
        })
        .unwrap_or(false)
}

// ============================================================================
// Time Conversion
// ============================================================================

/// Output unit of the elapsed-time column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    #[default]
    Hours,
    Minutes,
    Seconds,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Hours => "h",
            TimeUnit::Minutes => "min",
            TimeUnit::Seconds => "s",
        }
    }

    /// Convert elapsed seconds into this unit
    pub fn from_seconds(&self, seconds: f64) -> f64 {
        match self {
            TimeUnit::Hours => seconds / 3600.0,
            TimeUnit::Minutes => seconds / 60.0,
            TimeUnit::Seconds => seconds,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "h" => Ok(TimeUnit::Hours),
            "min" => Ok(TimeUnit::Minutes),
            "s" => Ok(TimeUnit::Seconds),
            other => Err(format!("unknown time unit '{}' (expected h, min or s)", other)),
        }
    }
}

/// Which cells carry the timestamp of a row
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeMode {
    /// Separate date and time-of-day columns
    DateAndTime {
        date_column: usize,
        time_column: usize,
    },
    /// A single time-of-day column, anchored on today's date
    TimeOnly { source_column: usize },
}

/// Configuration for one elapsed-time conversion
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeConversionConfig {
    pub mode: TimeMode,
    pub output_unit: TimeUnit,
    pub new_column_name: String,
}

impl TimeConversionConfig {
    pub fn new(mode: TimeMode, output_unit: TimeUnit) -> Self {
        Self {
            mode,
            output_unit,
            new_column_name: DEFAULT_TIME_COLUMN_NAME.to_string(),
        }
    }

    pub fn with_column_name(mut self, name: impl Into<String>) -> Self {
        self.new_column_name = name.into();
        self
    }

    /// Header of the appended column, e.g. `时间\h`
    pub fn output_column_name(&self) -> String {
        format!("{}{}{}", self.new_column_name, UNIT_SEPARATOR, self.output_unit)
    }

    /// Two-line worked example for the chosen mode and unit
    pub fn preview_text(&self) -> String {
        let unit = self.output_unit;
        match self.mode {
            TimeMode::DateAndTime { .. } => format!(
                "Example: 2025-01-01 10:00:00 -> 0 {unit}\nExample: 2025-01-01 11:00:00 -> {} {unit}",
                format_derived(unit.from_seconds(3600.0))
            ),
            TimeMode::TimeOnly { .. } => format!(
                "Example: 10:00:00 (baseline) -> 0 {unit}\nExample: 10:30:00 -> {} {unit}",
                format_derived(unit.from_seconds(1800.0))
            ),
        }
    }
}

/// Fixed-point rendering used for every derived cell
pub fn format_derived(value: f64) -> String {
    format!("{:.*}", DERIVED_VALUE_DECIMALS, value)
}

// ============================================================================
// Derived Column Results
// ============================================================================

/// A column appended by the derived-column engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedColumn {
    /// Index of the appended column
    pub column_index: usize,
    /// Header of the appended column
    pub column_name: String,
    /// Rows whose source cells parsed
    pub processed_rows: usize,
}

/// Flat success/error record of a derived-column operation
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedColumnReport {
    pub success: bool,
    pub error_message: String,
    pub added_column_index: Option<usize>,
    pub column_name: String,
    pub processed_rows: usize,
}

impl From<&DataResult<DerivedColumn>> for DerivedColumnReport {
    fn from(result: &DataResult<DerivedColumn>) -> Self {
        match result {
            Ok(column) => Self {
                success: true,
                error_message: String::new(),
                added_column_index: Some(column.column_index),
                column_name: column.column_name.clone(),
                processed_rows: column.processed_rows,
            },
            Err(e) => Self {
                success: false,
                error_message: e.to_string(),
                ..Self::default()
            },
        }
    }
}

// ============================================================================
// Editing
// ============================================================================

/// Where a new row or column goes relative to the focused cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InsertPosition {
    /// After the last row/column
    #[default]
    End,
    /// Above the focused row / left of the focused column
    Before,
    /// Below the focused row / right of the focused column
    After,
}

impl InsertPosition {
    /// Resolve to a concrete index; without focus every mode appends.
    pub fn resolve(&self, focused: Option<usize>, len: usize) -> usize {
        let index = match (self, focused) {
            (InsertPosition::Before, Some(f)) => f,
            (InsertPosition::After, Some(f)) => f.saturating_add(1),
            _ => len,
        };
        index.min(len)
    }
}

/// Notifications emitted outward to the hosting shell
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorEvent {
    /// Any cell, header or structure mutation
    DataChanged,
    /// A file finished loading
    FileLoaded { path: PathBuf, file_type: String },
}
