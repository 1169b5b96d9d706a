//! Project persistence codec
//!
//! A project is a JSON array: the first element carries the header labels,
//! every following element one row of cell strings.
//!
//! ```json
//! [
//!   { "headers": ["时间", "压力"] },
//!   { "row_data": ["10:00:00", "100"] },
//!   { "row_data": ["10:30:00", "90"] }
//! ]
//! ```
//!
//! Only headers and cells are stored; column types and units come back as
//! fresh Custom definitions.

use crate::data::error::DataResult;
use crate::data_table::DataTable;
use serde_json::{Map, Value, json};
use std::path::Path;

const HEADERS_KEY: &str = "headers";
const ROW_DATA_KEY: &str = "row_data";

/// Serialize headers and cells into the persistence array
pub fn serialize_table(table: &DataTable) -> Value {
    let mut records = Vec::with_capacity(table.row_count() + 1);
    records.push(json!({ "headers": table.headers() }));
    records.extend(
        table
            .to_rows()
            .into_iter()
            .map(|row| json!({ "row_data": row })),
    );
    Value::Array(records)
}

/// Rebuild a table from the persistence array.
///
/// Never fails: a non-array or empty value yields an empty table. Missing
/// labels are synthesized, short rows are padded, and non-string cells are
/// stringified (`null` becomes "").
pub fn deserialize_table(value: &Value) -> DataTable {
    let Some(records) = value.as_array() else {
        tracing::warn!("Project data is not an array; treating as empty");
        return DataTable::new();
    };

    let Some((first, rest)) = records.split_first() else {
        return DataTable::new();
    };

    let headers = string_array(first.as_object(), HEADERS_KEY);
    let rows: Vec<Vec<String>> = rest
        .iter()
        .map(|record| string_array(record.as_object(), ROW_DATA_KEY))
        .collect();

    DataTable::from_rows(headers, rows)
}

/// Read a project file from disk
pub fn read_project_file(path: &Path) -> DataResult<DataTable> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&content)?;
    let table = deserialize_table(&value);

    tracing::info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded project"
    );

    Ok(table)
}

/// Write a project file as pretty-printed JSON
pub fn write_project_file(table: &DataTable, path: &Path) -> DataResult<()> {
    let content = serde_json::to_string_pretty(&serialize_table(table))?;
    std::fs::write(path, content)?;

    tracing::info!(
        path = %path.display(),
        rows = table.row_count(),
        "Saved project"
    );

    Ok(())
}

fn string_array(record: Option<&Map<String, Value>>, key: &str) -> Vec<String> {
    record
        .and_then(|obj| obj.get(key))
        .and_then(Value::as_array)
        .map(|values| values.iter().map(value_to_cell).collect())
        .unwrap_or_default()
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
