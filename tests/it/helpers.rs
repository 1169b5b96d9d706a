//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `TestTableBuilder` - Builder pattern for creating grids with typed columns
//! - `write_fixture()` - Writes a file into a temp directory
//! - `column_cells()` - Reads one column back as `&str`s

use std::path::PathBuf;
use tempfile::TempDir;
use welltest_editor::DataTable;
use welltest_editor::types::{ColumnDefinition, ColumnType};

// ============================================================================
// TestTableBuilder - Builder pattern for creating test grids
// ============================================================================

/// Builder for creating test tables.
///
/// # Example
/// ```ignore
/// let table = TestTableBuilder::new()
///     .with_column("time", ColumnType::TimeOfDay, "")
///     .with_column("p", ColumnType::Pressure, "MPa")
///     .with_row(&["10:00:00", "100"])
///     .build();
/// ```
#[derive(Default)]
pub struct TestTableBuilder {
    definitions: Vec<ColumnDefinition>,
    rows: Vec<Vec<String>>,
}

impl TestTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a typed column.
    pub fn with_column(mut self, name: &str, column_type: ColumnType, unit: &str) -> Self {
        self.definitions.push(
            ColumnDefinition::named(name)
                .with_type(column_type)
                .with_unit(unit),
        );
        self
    }

    /// Add a row of cells.
    pub fn with_row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Build the table.
    pub fn build(self) -> DataTable {
        let mut table = DataTable::with_columns(self.definitions);
        for row in self.rows {
            table.insert_row(table.row_count(), row);
        }
        table
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Write `content` to `name` inside a fresh temp directory.
///
/// Keep the returned `TempDir` alive for as long as the file is needed.
pub fn write_fixture(name: &str, content: &[u8]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write fixture");
    (dir, path)
}

/// Cells of one column.
pub fn column_cells(table: &DataTable, column: usize) -> Vec<&str> {
    table
        .column(column)
        .map(|c| c.cells().iter().map(String::as_str).collect())
        .unwrap_or_default()
}
