//! Import preview state
//!
//! Backs the import prompt: holds the [`ImportSettings`] being edited and a
//! bounded preview of how the file parses under them. Every settings change
//! schedules a debounced refresh so rapid edits re-read the file once.
//!
//! Text files are previewed from their first `max_lines` lines; spreadsheets
//! from at most `max_rows` × `max_columns` cells of the first worksheet. The
//! bounds default to [`PREVIEW_MAX_LINES`], [`PREVIEW_MAX_ROWS`] and
//! [`PREVIEW_MAX_COLUMNS`] and can be overridden from [`EditorSettings`].
//!
//! [`PREVIEW_MAX_LINES`]: crate::constants::PREVIEW_MAX_LINES
//! [`PREVIEW_MAX_ROWS`]: crate::constants::PREVIEW_MAX_ROWS
//! [`PREVIEW_MAX_COLUMNS`]: crate::constants::PREVIEW_MAX_COLUMNS

use crate::constants::{
    PREVIEW_DEBOUNCE_MS, PREVIEW_MAX_COLUMNS, PREVIEW_MAX_LINES, PREVIEW_MAX_ROWS,
};
use crate::data::{DataResult, ParsedTable, SpreadsheetReader, parse_bytes, read_preview_bytes};
use crate::debounce::Debouncer;
use crate::settings::EditorSettings;
use crate::types::{DelimiterSelector, EncodingSelector, ImportSettings};
use std::time::Instant;

pub struct ImportPreview {
    settings: ImportSettings,
    table: ParsedTable,
    error: Option<String>,
    refresh: Debouncer<()>,
    max_lines: usize,
    max_rows: usize,
    max_columns: usize,
}

impl ImportPreview {
    pub fn new(settings: ImportSettings) -> Self {
        Self {
            settings,
            table: ParsedTable::default(),
            error: None,
            refresh: Debouncer::from_millis(PREVIEW_DEBOUNCE_MS),
            max_lines: PREVIEW_MAX_LINES,
            max_rows: PREVIEW_MAX_ROWS,
            max_columns: PREVIEW_MAX_COLUMNS,
        }
    }

    /// Preview using the debounce delay and bounds from the editor settings
    pub fn from_settings(editor: &EditorSettings, settings: ImportSettings) -> Self {
        Self {
            refresh: Debouncer::from_millis(editor.preview_debounce_ms),
            max_lines: editor.preview_max_lines.max(1),
            max_rows: editor.preview_max_rows.max(1),
            max_columns: editor.preview_max_columns.max(1),
            ..Self::new(settings)
        }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Preview rows under the current settings, as of the last refresh
    pub fn table(&self) -> &ParsedTable {
        &self.table
    }

    /// Message of the last failed refresh
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Encoding and delimiter only matter for delimited text
    pub fn text_options_enabled(&self) -> bool {
        !self.settings.is_spreadsheet
    }

    pub fn is_refresh_pending(&self) -> bool {
        self.refresh.is_pending()
    }

    // ------------------------------------------------------------------
    // Settings edits
    // ------------------------------------------------------------------

    pub fn set_encoding(&mut self, encoding: EncodingSelector, now: Instant) {
        self.settings.encoding = encoding;
        self.refresh.request(now, ());
    }

    pub fn set_delimiter(&mut self, delimiter: DelimiterSelector, now: Instant) {
        self.settings.delimiter = delimiter;
        self.refresh.request(now, ());
    }

    pub fn set_start_row(&mut self, start_row: usize, now: Instant) {
        self.settings.start_row = start_row.max(1);
        self.refresh.request(now, ());
    }

    pub fn set_header_row(&mut self, header_row: usize, now: Instant) {
        self.settings.header_row = header_row.max(1);
        self.refresh.request(now, ());
    }

    pub fn set_use_header(&mut self, use_header: bool, now: Instant) {
        self.settings.use_header = use_header;
        self.refresh.request(now, ());
    }

    // ------------------------------------------------------------------
    // Refresh
    // ------------------------------------------------------------------

    /// Refresh if a scheduled refresh has come due. Returns whether it ran.
    pub fn poll(&mut self, now: Instant, reader: &dyn SpreadsheetReader) -> bool {
        if self.refresh.poll(now).is_some() {
            self.refresh(reader);
            true
        } else {
            false
        }
    }

    /// Re-read the file now, dropping any scheduled refresh.
    ///
    /// Failures are kept in [`Self::error`] and leave an empty preview.
    pub fn refresh(&mut self, reader: &dyn SpreadsheetReader) {
        self.refresh.cancel();
        match self.load(reader) {
            Ok(table) => {
                self.table = table;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.settings.file_path.display(),
                    error = %e,
                    "Import preview failed"
                );
                self.table = ParsedTable::default();
                self.error = Some(e.to_string());
            }
        }
    }

    /// Settings to import with; the prompt's accept action
    pub fn accept(self) -> ImportSettings {
        self.settings
    }

    fn load(&self, reader: &dyn SpreadsheetReader) -> DataResult<ParsedTable> {
        if self.settings.is_spreadsheet {
            let rows =
                reader.read_preview(&self.settings.file_path, 1, self.max_rows, self.max_columns)?;
            Ok(self.settings.row_selection().apply(rows))
        } else {
            let raw = read_preview_bytes(&self.settings.file_path, self.max_lines)?;
            Ok(parse_bytes(&raw, &self.settings))
        }
    }
}
