//! Grid model tests

use crate::helpers::{TestTableBuilder, column_cells};
use welltest_editor::types::{ColumnDefinition, ColumnType};
use welltest_editor::{DataTable, RowFilter};

fn numbered_rows(count: usize) -> DataTable {
    let rows = (0..count).map(|i| vec![i.to_string()]).collect();
    DataTable::from_rows(vec!["n".to_string()], rows)
}

#[test]
fn test_remove_unordered_duplicate_rows() {
    let mut unordered = numbered_rows(10);
    let mut sorted = numbered_rows(10);

    unordered.remove_rows([3, 1, 3, 5]);
    sorted.remove_rows([5, 3, 1]);

    assert_eq!(unordered.row_count(), 7);
    assert!(unordered.same_content(&sorted));
    assert_eq!(
        column_cells(&unordered, 0),
        vec!["0", "2", "4", "6", "7", "8", "9"]
    );
}

#[test]
fn test_remove_columns_removes_metadata() {
    let mut table = TestTableBuilder::new()
        .with_column("t", ColumnType::TimeOfDay, "")
        .with_column("p", ColumnType::Pressure, "MPa")
        .with_column("q", ColumnType::FlowRate, "m3/d")
        .with_row(&["10:00", "100", "5"])
        .build();

    table.remove_columns([2, 0, 2]);

    assert_eq!(table.column_count(), 1);
    assert_eq!(table.definition(0).unwrap().column_type, ColumnType::Pressure);
    assert_eq!(table.row(0), Some(vec!["100"]));
}

#[test]
fn test_every_column_matches_row_count() {
    let mut table = numbered_rows(3);
    table.push_column(ColumnDefinition::named("x"));
    table.insert_row(0, vec!["a".into(), "b".into(), "c".into()]);
    table.remove_rows([2]);
    table.insert_column(0, ColumnDefinition::named("y"));

    assert_eq!(table.row_count(), 3);
    for column in table.columns() {
        assert_eq!(column.cells().len(), table.row_count());
    }
    assert_eq!(table.row(0), Some(vec!["", "a", "b"]));
}

#[test]
fn test_rows_without_columns() {
    let mut table = DataTable::new();
    table.insert_row(0, Vec::new());
    table.insert_row(0, Vec::new());

    assert_eq!(table.row_count(), 2);
    assert_eq!(table.column_count(), 0);
    assert_eq!(table.row(1), Some(Vec::new()));
}

#[test]
fn test_revision_only_moves_on_change() {
    let mut table = numbered_rows(2);
    let start = table.revision();

    assert_eq!(table.remove_rows([7, 9]), 0);
    assert_eq!(table.revision(), start);

    table.set_cell(0, 0, "x").unwrap();
    assert_eq!(table.revision(), start + 1);
}

#[test]
fn test_wildcard_filter_on_key_column() {
    let table = TestTableBuilder::new()
        .with_column("note", ColumnType::Custom, "")
        .with_column("t", ColumnType::TimeOfDay, "")
        .with_row(&["Shut-in", "10:00"])
        .with_row(&["flowing", "10:30"])
        .with_row(&["SHUT-IN end", "11:00"])
        .build();

    assert_eq!(table.matching_rows(&RowFilter::new("shut*")), vec![0, 2]);
    assert_eq!(table.matching_rows(&RowFilter::new("fl?w")), vec![1]);
    // Times live outside the key column
    assert!(table.matching_rows(&RowFilter::new("1?:00")).is_empty());
    assert_eq!(table.matching_rows(&RowFilter::new("  ")), vec![0, 1, 2]);
    assert!(table.matching_rows(&RowFilter::new("[")).is_empty());
}
