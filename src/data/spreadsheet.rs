//! Spreadsheet document reading
//!
//! The core never talks to a spreadsheet engine directly. It goes through
//! the [`SpreadsheetReader`] capability, which returns the used range of a
//! worksheet as rows of display strings. [`CalamineReader`] is the default
//! implementation, a pure-library codec for `.xls`, `.xlsx`, `.xlsm` and
//! `.ods` that needs no host application.
//!
//! Readers do not interpret start/header rows; callers apply
//! [`RowSelection`](crate::data::RowSelection) to the returned rows.

use crate::data::error::{DataError, DataResult};
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

/// Capability for reading worksheet cells as strings
pub trait SpreadsheetReader {
    /// Whether a spreadsheet engine can be reached at all
    fn is_available(&self) -> bool;

    /// Read the used range of the 1-based `sheet_index` worksheet.
    ///
    /// Fails with [`DataError::HostUnavailable`] when no engine is reachable
    /// and [`DataError::OpenFailed`] when the document cannot be opened.
    fn read_rows(&self, path: &Path, sheet_index: usize) -> DataResult<Vec<Vec<String>>>;

    /// Bounded read for the import preview: at most `max_rows` rows of
    /// `max_columns` cells.
    fn read_preview(
        &self,
        path: &Path,
        sheet_index: usize,
        max_rows: usize,
        max_columns: usize,
    ) -> DataResult<Vec<Vec<String>>> {
        let mut rows = self.read_rows(path, sheet_index)?;
        truncate_preview(&mut rows, max_rows, max_columns);
        Ok(rows)
    }
}

/// Clamp rows to the preview bounds in place
pub fn truncate_preview(rows: &mut Vec<Vec<String>>, max_rows: usize, max_columns: usize) {
    rows.truncate(max_rows);
    for row in rows.iter_mut() {
        row.truncate(max_columns);
    }
}

/// Spreadsheet reader backed by calamine.
///
/// The workbook handle is dropped at the end of every call, including on
/// error paths, so no document stays open between reads.
#[derive(Clone, Copy, Debug, Default)]
pub struct CalamineReader;

impl CalamineReader {
    pub fn new() -> Self {
        Self
    }

    fn read_sheet(
        &self,
        path: &Path,
        sheet_index: usize,
        max_rows: Option<usize>,
        max_columns: Option<usize>,
    ) -> DataResult<Vec<Vec<String>>> {
        let open_failed = |reason: String| DataError::OpenFailed {
            path: path.to_path_buf(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| open_failed(e.to_string()))?;

        let range = workbook
            .worksheet_range_at(sheet_index.saturating_sub(1))
            .ok_or_else(|| open_failed(format!("worksheet {} does not exist", sheet_index)))?
            .map_err(|e| open_failed(e.to_string()))?;

        let max_rows = max_rows.unwrap_or(usize::MAX);
        let max_columns = max_columns.unwrap_or(usize::MAX);

        let rows: Vec<Vec<String>> = range
            .rows()
            .take(max_rows)
            .map(|row| row.iter().take(max_columns).map(cell_to_string).collect())
            .collect();

        tracing::debug!(
            path = %path.display(),
            sheet = sheet_index,
            rows = rows.len(),
            "Read worksheet"
        );

        Ok(rows)
    }
}

impl SpreadsheetReader for CalamineReader {
    fn is_available(&self) -> bool {
        true
    }

    fn read_rows(&self, path: &Path, sheet_index: usize) -> DataResult<Vec<Vec<String>>> {
        self.read_sheet(path, sheet_index, None, None)
    }

    fn read_preview(
        &self,
        path: &Path,
        sheet_index: usize,
        max_rows: usize,
        max_columns: usize,
    ) -> DataResult<Vec<Vec<String>>> {
        self.read_sheet(path, sheet_index, Some(max_rows), Some(max_columns))
    }
}

/// A reader for hosts without any spreadsheet support
#[derive(Clone, Copy, Debug, Default)]
pub struct UnavailableReader;

impl SpreadsheetReader for UnavailableReader {
    fn is_available(&self) -> bool {
        false
    }

    fn read_rows(&self, _path: &Path, _sheet_index: usize) -> DataResult<Vec<Vec<String>>> {
        Err(DataError::HostUnavailable)
    }
}

/// Display form of a worksheet cell
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => format_number(*n),
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Data::Error(e) => e.to_string(),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            match dt.as_datetime() {
                // Serial below one day: a bare time of day
                Some(value) if serial < 1.0 => value.format("%H:%M:%S").to_string(),
                Some(value) if serial.fract() == 0.0 => value.format("%Y-%m-%d").to_string(),
                Some(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
                None => format_number(serial),
            }
        }
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Whole numbers without a fraction, everything else as-is
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
