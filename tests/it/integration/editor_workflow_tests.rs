//! Editor Workflow Integration Tests

use crate::helpers::{column_cells, write_fixture};
use std::time::{Duration, Instant};
use welltest_editor::types::{
    ColumnDefinition, ColumnType, EditorEvent, InsertPosition, TimeConversionConfig, TimeMode,
    TimeUnit,
};
use welltest_editor::{DataEditor, DataError};

const WELL_LOG: &[u8] = b"date,time,pressure\n\
2025-01-01,10:00:00,100\n\
2025-01-01,10:30:00,95\n\
2025-01-01,11:00:00,n/a\n\
2025-01-01,12:00:00,88\n";

#[test]
fn test_open_convert_save_reload() {
    let (dir, path) = write_fixture("well.csv", WELL_LOG);
    let mut editor = DataEditor::new();

    editor.open_file(&path).unwrap();
    assert_eq!(
        editor.poll_events(),
        vec![
            EditorEvent::DataChanged,
            EditorEvent::FileLoaded {
                path: path.clone(),
                file_type: "text".to_string(),
            },
        ]
    );
    assert_eq!(editor.table().headers(), vec!["date", "time", "pressure"]);
    assert_eq!(editor.table().row_count(), 4);

    let config = TimeConversionConfig::new(
        TimeMode::DateAndTime {
            date_column: 0,
            time_column: 1,
        },
        TimeUnit::Hours,
    );
    let time = editor.convert_time(&config).unwrap();
    assert_eq!(time.column_index, 3);
    assert_eq!(time.processed_rows, 4);
    assert_eq!(
        column_cells(editor.table(), 3),
        vec!["0.000", "0.500", "1.000", "2.000"]
    );

    // Header match: "pressure"
    let drop = editor.compute_pressure_drop().unwrap();
    assert_eq!(drop.column_name, "压降\\");
    assert_eq!(drop.processed_rows, 3);
    assert_eq!(
        column_cells(editor.table(), 4),
        vec!["0.000", "5.000", "", "12.000"]
    );
    assert_eq!(
        editor.poll_events(),
        vec![EditorEvent::DataChanged, EditorEvent::DataChanged]
    );

    let project = dir.path().join("well.json");
    editor.save_project(&project).unwrap();
    assert_eq!(editor.current_file(), Some(project.as_path()));

    let mut reloaded = DataEditor::new();
    reloaded.open_file(&project).unwrap();

    assert!(reloaded.table().same_content(editor.table()));
    assert!(
        reloaded
            .definitions()
            .iter()
            .all(|d| d.column_type == ColumnType::Custom)
    );
    assert!(matches!(
        reloaded.poll_events().last(),
        Some(EditorEvent::FileLoaded { file_type, .. }) if file_type == "json"
    ));
}

#[test]
fn test_typed_pressure_column_and_unit() {
    let (_dir, path) = write_fixture("p.csv", b"t,pwf\n10:00,30.5\n10:10,29.25\n");
    let mut editor = DataEditor::new();
    editor.open_file(&path).unwrap();

    editor
        .define_columns(vec![
            ColumnDefinition::named("t").with_type(ColumnType::TimeOfDay),
            ColumnDefinition::named("pwf")
                .with_type(ColumnType::Pressure)
                .with_unit("MPa"),
        ])
        .unwrap();

    let drop = editor.compute_pressure_drop().unwrap();

    assert_eq!(drop.column_name, "压降\\MPa");
    assert_eq!(column_cells(editor.table(), 2), vec!["0.000", "1.250"]);
    assert_eq!(editor.definitions()[2].column_type, ColumnType::PressureDrop);
}

#[test]
fn test_manual_entry_then_convert() {
    let mut editor = DataEditor::new();
    let row = editor.insert_row(InsertPosition::End, None);
    editor.set_cell(row, 0, "23:50:00").unwrap();
    let row = editor.insert_row(InsertPosition::After, Some(row));
    editor.set_cell(row, 0, "00:10:00").unwrap();

    let config =
        TimeConversionConfig::new(TimeMode::TimeOnly { source_column: 0 }, TimeUnit::Minutes);
    editor.convert_time(&config).unwrap();

    assert_eq!(column_cells(editor.table(), 1), vec!["0.000", "20.000"]);
}

#[test]
fn test_delete_and_search() {
    let (_dir, path) = write_fixture(
        "notes.csv",
        b"note,time\nstart,10:00\nshut-in,10:10\nflow,10:20\nSHUT-IN 2,10:30\n",
    );
    let mut editor = DataEditor::new();
    editor.open_file(&path).unwrap();

    assert_eq!(editor.delete_rows([2, 2]), 1);

    let now = Instant::now();
    editor.set_search_text("shut*", now);
    assert!(editor.poll(now + Duration::from_millis(300)));
    assert_eq!(editor.visible_rows(), vec![1, 2]);

    // The time column becomes the key column
    assert_eq!(editor.delete_columns([0]), 1);
    assert!(editor.visible_rows().is_empty());
}

#[test]
fn test_failed_open_keeps_grid() {
    let (dir, path) = write_fixture("ok.csv", b"a,b\n1,2\n");
    let mut editor = DataEditor::new();
    editor.open_file(&path).unwrap();
    editor.poll_events();

    let err = editor.open_file(&dir.path().join("missing.csv")).unwrap_err();

    assert!(matches!(err, DataError::Io(_)));
    assert_eq!(editor.table().row(0), Some(vec!["1", "2"]));
    assert_eq!(editor.current_file(), Some(path.as_path()));
    assert!(editor.poll_events().is_empty());
}

#[test]
fn test_clear_all_resets_state() {
    let (_dir, path) = write_fixture("ok.csv", b"a\n1\n");
    let mut editor = DataEditor::new();
    editor.open_file(&path).unwrap();

    editor.clear_all();

    assert!(editor.table().is_empty());
    assert_eq!(editor.current_file(), None);
    assert!(!editor.availability().save);
}
