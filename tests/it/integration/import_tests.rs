//! Import Integration Tests
//!
//! Spreadsheet imports run against an in-memory reader so the row-selection
//! and swap-on-success behaviour can be checked without workbook fixtures.

use crate::helpers::write_fixture;
use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};
use welltest_editor::data::{DataResult, SpreadsheetReader};
use welltest_editor::import_preview::ImportPreview;
use welltest_editor::types::{EditorEvent, ImportSettings};
use welltest_editor::{DataEditor, DataError, EditorSettings};

/// Serves fixed rows and counts how often it was asked
struct FixedReader {
    rows: Vec<Vec<String>>,
    reads: Rc<Cell<usize>>,
}

impl FixedReader {
    fn new(rows: &[&[&str]]) -> (Self, Rc<Cell<usize>>) {
        let reads = Rc::new(Cell::new(0));
        let reader = Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            reads: reads.clone(),
        };
        (reader, reads)
    }
}

impl SpreadsheetReader for FixedReader {
    fn is_available(&self) -> bool {
        true
    }

    fn read_rows(&self, path: &Path, sheet_index: usize) -> DataResult<Vec<Vec<String>>> {
        self.reads.set(self.reads.get() + 1);
        if path.file_stem().and_then(|s| s.to_str()) == Some("locked") {
            return Err(DataError::OpenFailed {
                path: path.to_path_buf(),
                reason: "file is locked".to_string(),
            });
        }
        assert_eq!(sheet_index, 1);
        Ok(self.rows.clone())
    }
}

fn sheet() -> (FixedReader, Rc<Cell<usize>>) {
    FixedReader::new(&[
        &["Well report", "", ""],
        &["date", "time", "pressure"],
        &["2025-01-01", "10:00:00", "100"],
        &["", "", ""],
        &["2025-01-01", "11:00:00", "90"],
    ])
}

#[test]
fn test_spreadsheet_row_selection() {
    let (reader, reads) = sheet();
    let mut editor = DataEditor::with_reader(Box::new(reader), EditorSettings::default());
    let settings = ImportSettings {
        start_row: 3,
        header_row: 2,
        ..ImportSettings::for_path("report.xlsx")
    };

    editor.load_with_settings(&settings).unwrap();

    assert_eq!(reads.get(), 1);
    assert_eq!(editor.table().headers(), vec!["date", "time", "pressure"]);
    // Spreadsheet rows are not subject to the empty-line skip
    assert_eq!(editor.table().row_count(), 3);
    assert_eq!(editor.table().row(1), Some(vec!["", "", ""]));
}

#[test]
fn test_spreadsheet_open_failure_leaves_grid() {
    let (reader, _) = sheet();
    let mut editor = DataEditor::with_reader(Box::new(reader), EditorSettings::default());
    editor.open_file(Path::new("report.xlsx")).unwrap();
    editor.poll_events();
    let before = editor.table().clone();

    let err = editor.open_file(Path::new("locked.xlsx")).unwrap_err();

    assert!(matches!(err, DataError::OpenFailed { .. }));
    assert_eq!(editor.table(), &before);
    assert!(editor.poll_events().is_empty());
}

#[test]
fn test_load_data_echoes_file_type() {
    let (_dir, path) = write_fixture("log.txt", b"a\tb\n1\t2\n");
    let mut editor = DataEditor::new();

    editor.load_data(&path, "pressure-log").unwrap();

    assert_eq!(editor.table().headers(), vec!["a", "b"]);
    assert_eq!(
        editor.poll_events().last(),
        Some(&EditorEvent::FileLoaded {
            path: PathBuf::from(&path),
            file_type: "pressure-log".to_string(),
        })
    );
}

#[test]
fn test_editor_settings_seed_open() {
    let (_dir, path) = write_fixture("semi.csv", b"# exported\nx;y\n1;2\n");
    let settings = EditorSettings {
        delimiter: "semicolon".parse().unwrap(),
        start_row: 3,
        header_row: 2,
        ..EditorSettings::default()
    };
    let (reader, _) = sheet();
    let mut editor = DataEditor::with_reader(Box::new(reader), settings);

    editor.open_file(&path).unwrap();

    assert_eq!(editor.table().headers(), vec!["x", "y"]);
    assert_eq!(editor.table().row(0), Some(vec!["1", "2"]));
}

#[test]
fn test_ragged_rows_are_padded() {
    let (_dir, path) = write_fixture("ragged.csv", b"a,b\n1\n1,2,3\n");
    let mut editor = DataEditor::new();

    editor.open_file(&path).unwrap();

    assert_eq!(editor.table().headers(), vec!["a", "b", "Col 3"]);
    assert_eq!(editor.table().row(0), Some(vec!["1", "", ""]));
    assert_eq!(editor.table().row(1), Some(vec!["1", "2", "3"]));
}

fn wide_sheet() -> (FixedReader, Rc<Cell<usize>>) {
    let wide: Vec<Vec<String>> = (0..60)
        .map(|r| (0..25).map(|c| format!("r{}c{}", r, c)).collect())
        .collect();
    let rows: Vec<Vec<&str>> = wide
        .iter()
        .map(|r| r.iter().map(String::as_str).collect())
        .collect();
    let row_refs: Vec<&[&str]> = rows.iter().map(Vec::as_slice).collect();
    FixedReader::new(&row_refs)
}

#[test]
fn test_preview_spreadsheet_bounded_and_debounced() {
    let (reader, reads) = wide_sheet();

    let mut preview = ImportPreview::new(ImportSettings::for_path("wide.xlsx"));
    let start = Instant::now();
    preview.set_header_row(2, start);
    preview.set_start_row(3, start + Duration::from_millis(100));
    preview.set_start_row(4, start + Duration::from_millis(150));

    assert!(!preview.poll(start + Duration::from_millis(300), &reader));
    assert!(preview.poll(start + Duration::from_millis(350), &reader));
    assert_eq!(reads.get(), 1);

    let table = preview.table();
    assert_eq!(table.header.len(), 20);
    assert_eq!(table.header[0], "r1c0");
    // 50 rows read, minus three above the first data row
    assert_eq!(table.rows.len(), 47);
    assert_eq!(table.rows[0][19], "r3c19");
}

#[test]
fn test_preview_spreadsheet_uses_configured_bounds() {
    let (reader, _) = wide_sheet();
    let editor = EditorSettings {
        preview_max_rows: 6,
        preview_max_columns: 3,
        ..EditorSettings::default()
    };
    let mut preview = ImportPreview::from_settings(&editor, ImportSettings::for_path("wide.xlsx"));

    preview.refresh(&reader);

    let table = preview.table();
    assert_eq!(table.header, vec!["r0c0", "r0c1", "r0c2"]);
    assert_eq!(table.rows.len(), 5);
    assert_eq!(table.rows[4], vec!["r5c0", "r5c1", "r5c2"]);
}
