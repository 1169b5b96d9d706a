//! Editor controller
//!
//! [`DataEditor`] owns the grid and the current file path. It routes file
//! opens by extension, pairs structural edits with their column metadata,
//! runs the derived-column engine and reports every change as an
//! [`EditorEvent`] for the hosting shell to pick up with
//! [`DataEditor::poll_events`].
//!
//! Imports build the new table off to the side and swap it in only on
//! success, so a failed open never leaves a half-loaded grid.

use crate::constants::NEW_COLUMN_NAME;
use crate::data::{
    CalamineReader, DataError, DataResult, ParsedTable, SpreadsheetReader, compute_pressure_drop,
    convert_time, deserialize_table, parse_file, read_project_file, serialize_table,
    write_project_file,
};
use crate::data_table::{DataTable, RowFilter};
use crate::debounce::Debouncer;
use crate::settings::EditorSettings;
use crate::types::{
    ColumnDefinition, DerivedColumn, EditorEvent, ImportSettings, InsertPosition,
    TimeConversionConfig, is_project_file, is_spreadsheet_file,
};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// File type tag reported for project files
pub const FILE_TYPE_JSON: &str = "json";
/// File type tag reported for delimited text and spreadsheet imports
pub const FILE_TYPE_TEXT: &str = "text";

/// Which grid actions currently make sense
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionAvailability {
    pub save: bool,
    pub define_columns: bool,
    pub convert_time: bool,
    pub pressure_drop: bool,
}

pub struct DataEditor {
    table: DataTable,
    current_file: Option<PathBuf>,
    reader: Box<dyn SpreadsheetReader>,
    settings: EditorSettings,
    events: Vec<EditorEvent>,
    seen_revision: u64,
    filter: RowFilter,
    search: Debouncer<String>,
}

impl Default for DataEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DataEditor {
    /// Editor with default settings and the calamine spreadsheet reader
    pub fn new() -> Self {
        Self::with_reader(Box::new(CalamineReader::new()), EditorSettings::default())
    }

    pub fn with_reader(reader: Box<dyn SpreadsheetReader>, settings: EditorSettings) -> Self {
        let search = Debouncer::from_millis(settings.search_debounce_ms);
        Self {
            table: DataTable::new(),
            current_file: None,
            reader,
            settings,
            events: Vec::new(),
            seen_revision: 0,
            filter: RowFilter::new(""),
            search,
        }
    }

    pub fn table(&self) -> &DataTable {
        &self.table
    }

    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Import settings the open prompt starts from for `path`
    pub fn default_import_settings(&self, path: impl Into<PathBuf>) -> ImportSettings {
        self.settings.import_settings(path)
    }

    /// Drain pending notifications, oldest first
    pub fn poll_events(&mut self) -> Vec<EditorEvent> {
        self.sync_revision();
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Loading and saving
    // ========================================================================

    /// Open a file the way the Open action does: `.json` as a project,
    /// anything else imported with the default settings.
    pub fn open_file(&mut self, path: &Path) -> DataResult<()> {
        if is_project_file(path) {
            self.load_project(path)
        } else {
            let settings = self.default_import_settings(path);
            self.load_with_settings(&settings)
        }
    }

    /// Load `path` on behalf of a host that already knows its type.
    ///
    /// `file_type` is echoed back in the [`EditorEvent::FileLoaded`] event.
    pub fn load_data(&mut self, path: &Path, file_type: &str) -> DataResult<()> {
        let table = if file_type == FILE_TYPE_JSON || is_project_file(path) {
            read_project_file(path)?
        } else {
            let settings = self.default_import_settings(path);
            DataTable::from_parsed(self.import(&settings)?)
        };
        self.install(table, path, file_type);
        Ok(())
    }

    /// Import delimited text or a spreadsheet under explicit settings
    pub fn load_with_settings(&mut self, settings: &ImportSettings) -> DataResult<()> {
        let parsed = self.import(settings)?;
        let table = DataTable::from_parsed(parsed);
        self.install(table, &settings.file_path, FILE_TYPE_TEXT);
        Ok(())
    }

    pub fn load_project(&mut self, path: &Path) -> DataResult<()> {
        let table = read_project_file(path)?;
        self.install(table, path, FILE_TYPE_JSON);
        Ok(())
    }

    /// Write the grid as a project file and make it the current file
    pub fn save_project(&mut self, path: &Path) -> DataResult<()> {
        write_project_file(&self.table, path)?;
        self.current_file = Some(path.to_path_buf());
        Ok(())
    }

    /// The grid in persistence form, for an external project store
    pub fn project_value(&self) -> Value {
        serialize_table(&self.table)
    }

    /// Replace the grid from an external project store.
    ///
    /// Malformed values load as an empty grid.
    pub fn set_project_value(&mut self, value: &Value) {
        self.table.replace_with(deserialize_table(value));
        self.reset_filter();
        self.sync_revision();
    }

    /// Drop all data and forget the current file
    pub fn clear_all(&mut self) {
        self.table.clear();
        self.current_file = None;
        self.reset_filter();
        self.sync_revision();
    }

    fn import(&self, settings: &ImportSettings) -> DataResult<ParsedTable> {
        if settings.is_spreadsheet || is_spreadsheet_file(&settings.file_path) {
            if !self.reader.is_available() {
                return Err(DataError::HostUnavailable);
            }
            let rows = self.reader.read_rows(&settings.file_path, 1)?;
            Ok(settings.row_selection().apply(rows))
        } else {
            parse_file(settings)
        }
    }

    fn install(&mut self, table: DataTable, path: &Path, file_type: &str) {
        tracing::info!(
            path = %path.display(),
            file_type,
            rows = table.row_count(),
            columns = table.column_count(),
            "Loaded file"
        );

        self.table.replace_with(table);
        self.current_file = Some(path.to_path_buf());
        self.reset_filter();
        self.sync_revision();
        self.events.push(EditorEvent::FileLoaded {
            path: path.to_path_buf(),
            file_type: file_type.to_string(),
        });
    }

    // ========================================================================
    // Editing
    // ========================================================================

    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<String>) -> DataResult<()> {
        self.table.set_cell(row, column, value)?;
        self.sync_revision();
        Ok(())
    }

    pub fn set_header(&mut self, column: usize, label: impl Into<String>) -> DataResult<()> {
        self.table.set_header(column, label)?;
        self.sync_revision();
        Ok(())
    }

    pub fn definitions(&self) -> Vec<ColumnDefinition> {
        self.table.definitions().cloned().collect()
    }

    /// Apply column definitions by index; headers follow the new names.
    ///
    /// A shorter list leaves the remaining columns as they are. A longer
    /// list is rejected before anything changes.
    pub fn define_columns(&mut self, definitions: Vec<ColumnDefinition>) -> DataResult<()> {
        let count = self.table.column_count();
        if definitions.len() > count {
            return Err(DataError::ColumnOutOfRange {
                index: definitions.len() - 1,
                count,
            });
        }

        for (index, definition) in definitions.into_iter().enumerate() {
            self.table.set_definition(index, definition)?;
        }
        self.sync_revision();
        Ok(())
    }

    /// Insert an empty row relative to the focused row.
    ///
    /// A grid without columns first gets one. Returns the new row's index.
    pub fn insert_row(&mut self, position: InsertPosition, focused_row: Option<usize>) -> usize {
        if self.table.column_count() == 0 {
            self.table.push_column(ColumnDefinition::named(NEW_COLUMN_NAME));
        }
        let at = position.resolve(focused_row, self.table.row_count());
        let at = self.table.insert_row(at, Vec::new());
        self.sync_revision();
        at
    }

    /// Insert an empty Custom column relative to the focused column
    pub fn insert_column(&mut self, position: InsertPosition, focused_column: Option<usize>) -> usize {
        let at = position.resolve(focused_column, self.table.column_count());
        let at = self
            .table
            .insert_column(at, ColumnDefinition::named(NEW_COLUMN_NAME));
        self.sync_revision();
        at
    }

    pub fn delete_rows(&mut self, rows: impl IntoIterator<Item = usize>) -> usize {
        let removed = self.table.remove_rows(rows);
        self.sync_revision();
        removed
    }

    pub fn delete_columns(&mut self, columns: impl IntoIterator<Item = usize>) -> usize {
        let removed = self.table.remove_columns(columns);
        self.sync_revision();
        removed
    }

    // ========================================================================
    // Derived columns
    // ========================================================================

    pub fn convert_time(&mut self, config: &TimeConversionConfig) -> DataResult<DerivedColumn> {
        let result = convert_time(&mut self.table, config);
        self.log_derived("time conversion", &result);
        self.sync_revision();
        result
    }

    pub fn compute_pressure_drop(&mut self) -> DataResult<DerivedColumn> {
        let result = compute_pressure_drop(&mut self.table);
        self.log_derived("pressure drop", &result);
        self.sync_revision();
        result
    }

    fn log_derived(&self, operation: &str, result: &DataResult<DerivedColumn>) {
        match result {
            Ok(column) => tracing::info!(
                operation,
                column = %column.column_name,
                processed = column.processed_rows,
                "Derived column added"
            ),
            Err(e) => tracing::warn!(operation, error = %e, "Derived column failed"),
        }
    }

    // ========================================================================
    // Availability and search
    // ========================================================================

    /// Grid actions need at least one row and one column
    pub fn availability(&self) -> ActionAvailability {
        let enabled = self.table.row_count() > 0 && self.table.column_count() > 0;
        ActionAvailability {
            save: enabled,
            define_columns: enabled,
            convert_time: enabled,
            pressure_drop: enabled,
        }
    }

    /// Schedule a new search pattern; applied by [`Self::poll`] once the
    /// typing settles
    pub fn set_search_text(&mut self, text: impl Into<String>, now: Instant) {
        self.search.request(now, text.into());
    }

    /// Apply a due search pattern. Returns whether the filter changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.search.poll(now) {
            Some(pattern) => {
                self.filter = RowFilter::new(&pattern);
                true
            }
            None => false,
        }
    }

    pub fn search_text(&self) -> &str {
        self.filter.pattern()
    }

    /// Rows matching the active search pattern
    pub fn visible_rows(&self) -> Vec<usize> {
        self.table.matching_rows(&self.filter)
    }

    fn reset_filter(&mut self) {
        self.search.cancel();
        self.filter = RowFilter::new("");
    }

    fn sync_revision(&mut self) {
        let revision = self.table.revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.events.push(EditorEvent::DataChanged);
        }
    }
}
