//! The editable grid: ordered rows × typed columns.
//!
//! Each [`Column`] owns both its metadata ([`ColumnDefinition`]) and its
//! cells, so inserting or removing a column can never leave the schema and
//! the data out of step. Every column always holds exactly `row_count`
//! cells. Cells are display strings; there is no typed cell storage.
//!
//! ## Change tracking
//!
//! Every mutation bumps [`DataTable::revision`]. The editor compares
//! revisions to emit a single "data changed" notification per batch of
//! edits.

use crate::data::{DataError, DataResult, ParsedTable, default_header};
use crate::types::{ColumnDefinition, ColumnType};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeSet;

/// One grid column: metadata plus one cell per row
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Column {
    pub definition: ColumnDefinition,
    cells: Vec<String>,
}

impl Column {
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

/// In-memory table with index-aligned column metadata
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataTable {
    columns: Vec<Column>,
    row_count: usize,
    revision: u64,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from header labels and possibly ragged rows.
    ///
    /// The table is as wide as the widest of the header and the rows; short
    /// rows are padded with empty cells and missing labels get "Col N".
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);

        let mut columns: Vec<Column> = (0..width)
            .map(|i| Column {
                definition: ColumnDefinition::named(
                    headers.get(i).cloned().unwrap_or_else(|| default_header(i)),
                ),
                cells: Vec::with_capacity(rows.len()),
            })
            .collect();

        let row_count = rows.len();
        for row in rows {
            let mut values = row.into_iter();
            for column in columns.iter_mut() {
                column.cells.push(values.next().unwrap_or_default());
            }
        }

        Self {
            columns,
            row_count,
            revision: 0,
        }
    }

    /// Build a table from parser output
    pub fn from_parsed(parsed: ParsedTable) -> Self {
        Self::from_rows(parsed.header, parsed.rows)
    }

    /// Empty table with the given column definitions
    pub fn with_columns(definitions: Vec<ColumnDefinition>) -> Self {
        Self {
            columns: definitions
                .into_iter()
                .map(|definition| Column {
                    definition,
                    cells: Vec::new(),
                })
                .collect(),
            row_count: 0,
            revision: 0,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0 && self.columns.is_empty()
    }

    /// Monotonic counter bumped by every mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn definition(&self, index: usize) -> Option<&ColumnDefinition> {
        self.columns.get(index).map(|c| &c.definition)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().map(|c| &c.definition)
    }

    pub fn header(&self, column: usize) -> Option<&str> {
        self.columns.get(column).map(|c| c.definition.name.as_str())
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.definition.name.as_str()).collect()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        if row >= self.row_count {
            return None;
        }
        self.columns
            .get(column)
            .and_then(|c| c.cells.get(row))
            .map(String::as_str)
    }

    /// Cell text, or "" when the address does not exist
    pub fn cell_or_empty(&self, row: usize, column: usize) -> &str {
        self.cell(row, column).unwrap_or("")
    }

    /// Cells of one row in column order
    pub fn row(&self, row: usize) -> Option<Vec<&str>> {
        (row < self.row_count).then(|| {
            self.columns
                .iter()
                .map(|c| c.cells[row].as_str())
                .collect()
        })
    }

    /// All rows as owned strings, in row order
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        (0..self.row_count)
            .map(|r| self.columns.iter().map(|c| c.cells[r].clone()).collect())
            .collect()
    }

    /// Lowest-index column of the given semantic type
    pub fn find_column_by_type(&self, column_type: ColumnType) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.definition.column_type == column_type)
    }

    /// Indices of rows whose key (first) column matches `filter`.
    ///
    /// Without columns every row has an empty key.
    pub fn matching_rows(&self, filter: &RowFilter) -> Vec<usize> {
        let key = self.columns.first();
        (0..self.row_count)
            .filter(|&r| filter.matches(key.map_or("", |c| c.cells[r].as_str())))
            .collect()
    }

    // ------------------------------------------------------------------
    // Cell and header edits
    // ------------------------------------------------------------------

    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) -> DataResult<()> {
        if row >= self.row_count {
            return Err(DataError::CellOutOfRange { row, column });
        }
        let cell = self
            .columns
            .get_mut(column)
            .and_then(|c| c.cells.get_mut(row))
            .ok_or(DataError::CellOutOfRange { row, column })?;
        *cell = value.into();
        self.touch();
        Ok(())
    }

    pub fn set_header(&mut self, column: usize, label: impl Into<String>) -> DataResult<()> {
        let count = self.columns.len();
        let col = self
            .columns
            .get_mut(column)
            .ok_or(DataError::ColumnOutOfRange {
                index: column,
                count,
            })?;
        col.definition.name = label.into();
        self.touch();
        Ok(())
    }

    /// Replace a column's metadata; the header follows `definition.name`
    pub fn set_definition(&mut self, column: usize, definition: ColumnDefinition) -> DataResult<()> {
        let count = self.columns.len();
        let col = self
            .columns
            .get_mut(column)
            .ok_or(DataError::ColumnOutOfRange {
                index: column,
                count,
            })?;
        col.definition = definition;
        self.touch();
        Ok(())
    }

    // ------------------------------------------------------------------
    // Structure edits
    // ------------------------------------------------------------------

    /// Insert a row at `at` (clamped to `row_count`).
    ///
    /// `values` is padded with empty cells or truncated to the column count.
    /// Returns the index the row landed at.
    pub fn insert_row(&mut self, at: usize, values: Vec<String>) -> usize {
        let at = at.min(self.row_count);
        let mut values = values.into_iter();
        for column in self.columns.iter_mut() {
            column.cells.insert(at, values.next().unwrap_or_default());
        }
        self.row_count += 1;
        self.touch();
        at
    }

    /// Remove rows by index.
    ///
    /// Accepts an unordered set with duplicates; indices are de-duplicated
    /// and removed from highest to lowest. Out-of-range indices are ignored.
    /// Returns the number of rows removed.
    pub fn remove_rows(&mut self, indices: impl IntoIterator<Item = usize>) -> usize {
        let unique: BTreeSet<usize> = indices
            .into_iter()
            .filter(|&i| i < self.row_count)
            .collect();

        for &row in unique.iter().rev() {
            for column in self.columns.iter_mut() {
                column.cells.remove(row);
            }
            self.row_count -= 1;
        }

        if !unique.is_empty() {
            self.touch();
        }
        unique.len()
    }

    /// Insert a column at `at` (clamped to `column_count`) with one empty
    /// cell per existing row. Returns the index the column landed at.
    pub fn insert_column(&mut self, at: usize, definition: ColumnDefinition) -> usize {
        let at = at.min(self.columns.len());
        self.columns.insert(
            at,
            Column {
                definition,
                cells: vec![String::new(); self.row_count],
            },
        );
        self.touch();
        at
    }

    /// Append a column after the last one
    pub fn push_column(&mut self, definition: ColumnDefinition) -> usize {
        self.insert_column(self.columns.len(), definition)
    }

    /// Append a column with pre-computed cells, padded or truncated to
    /// `row_count`, as a single mutation
    pub fn push_column_with_cells(&mut self, definition: ColumnDefinition, cells: Vec<String>) -> usize {
        let mut cells = cells;
        cells.resize(self.row_count, String::new());
        self.columns.push(Column { definition, cells });
        self.touch();
        self.columns.len() - 1
    }

    /// Remove columns (and their metadata) by index, with the same
    /// de-duplicate and descending-order contract as [`Self::remove_rows`].
    pub fn remove_columns(&mut self, indices: impl IntoIterator<Item = usize>) -> usize {
        let unique: BTreeSet<usize> = indices
            .into_iter()
            .filter(|&i| i < self.columns.len())
            .collect();

        for &column in unique.iter().rev() {
            self.columns.remove(column);
        }

        if !unique.is_empty() {
            self.touch();
        }
        unique.len()
    }

    /// Drop every row, column and header
    pub fn clear(&mut self) {
        self.columns.clear();
        self.row_count = 0;
        self.touch();
    }

    /// Replace the whole content with another table's, as one mutation
    pub fn replace_with(&mut self, other: DataTable) {
        self.columns = other.columns;
        self.row_count = other.row_count;
        self.touch();
    }

    /// Same headers and cells, ignoring metadata and revision
    pub fn same_content(&self, other: &DataTable) -> bool {
        self.headers() == other.headers() && self.to_rows() == other.to_rows()
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Case-insensitive wildcard filter (`*` any run, `?` one character)
/// matched anywhere inside a cell.
#[derive(Clone, Debug)]
pub struct RowFilter {
    pattern: String,
    regex: Option<Regex>,
}

impl RowFilter {
    pub fn new(pattern: &str) -> Self {
        let pattern = pattern.trim().to_string();
        let regex = if pattern.is_empty() {
            None
        } else {
            let mut expr = String::with_capacity(pattern.len() * 2);
            for ch in pattern.chars() {
                match ch {
                    '*' => expr.push_str(".*"),
                    '?' => expr.push('.'),
                    other => expr.push_str(&regex::escape(&other.to_string())),
                }
            }
            // Escaped input always compiles
            RegexBuilder::new(&expr).case_insensitive(true).build().ok()
        };
        Self { pattern, regex }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Empty patterns match everything
    pub fn matches(&self, text: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(text),
            None => true,
        }
    }
}
