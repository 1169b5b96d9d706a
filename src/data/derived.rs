//! Derived-column engine
//!
//! Two transforms that scan the grid once and append one computed column:
//! elapsed time since the first parsed timestamp, and pressure drop from the
//! first parsed pressure. Both share [`scan_with_baseline`].
//!
//! Rows whose source cells do not parse get an empty derived cell and are
//! not counted as processed. They never set or move the baseline.

use crate::constants::{
    DATE_FORMATS, PRESSURE_DROP_COLUMN_NAME, PRESSURE_HEADER_KEYWORD, PRESSURE_HEADER_KEYWORD_EN,
    TIME_FORMATS, UNIT_SEPARATOR,
};
use crate::data::error::{DataError, DataResult};
use crate::data_table::DataTable;
use crate::types::{
    ColumnDefinition, ColumnType, DerivedColumn, TimeConversionConfig, TimeMode, format_derived,
};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

// ============================================================================
// Lazy Baseline
// ============================================================================

/// Scan `items`, taking the first value `parse` accepts as the baseline.
///
/// Each parsed item yields `relative(&baseline, &value)`, the baseline row
/// included. Items that fail to parse yield `None` and leave the baseline
/// untouched.
pub fn scan_with_baseline<I, T, P, R>(items: I, mut parse: P, mut relative: R) -> Vec<Option<f64>>
where
    I: IntoIterator,
    P: FnMut(I::Item) -> Option<T>,
    R: FnMut(&T, &T) -> f64,
{
    let mut baseline: Option<T> = None;

    items
        .into_iter()
        .map(|item| {
            let value = parse(item)?;
            match &baseline {
                Some(base) => Some(relative(base, &value)),
                None => {
                    let delta = relative(&value, &value);
                    baseline = Some(value);
                    Some(delta)
                }
            }
        })
        .collect()
}

/// Format scan output as derived cells, counting the rows that produced a value
fn render_cells(values: &[Option<f64>]) -> (Vec<String>, usize) {
    let processed = values.iter().filter(|v| v.is_some()).count();
    let cells = values
        .iter()
        .map(|v| v.map(format_derived).unwrap_or_default())
        .collect();
    (cells, processed)
}

fn ensure_column(table: &DataTable, index: usize) -> DataResult<()> {
    if index < table.column_count() {
        Ok(())
    } else {
        Err(DataError::ColumnOutOfRange {
            index,
            count: table.column_count(),
        })
    }
}

// ============================================================================
// Cell Parsing
// ============================================================================

/// Parse a date cell, trying each accepted format in order
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Parse a time-of-day cell (`hh:mm:ss`, `h:mm:ss` or `hh:mm`).
///
/// Seconds stop at 59; chrono's leap-second form (`:60`) is rejected.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
        .filter(|t| t.nanosecond() < 1_000_000_000)
}

/// Parse a numeric cell; blanks, text and non-finite values are rejected
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn elapsed_seconds(from: &NaiveDateTime, to: &NaiveDateTime) -> f64 {
    (*to - *from).num_milliseconds() as f64 / 1000.0
}

// ============================================================================
// Time Conversion
// ============================================================================

/// Append an elapsed-time column, anchoring time-only input on today's date
pub fn convert_time(table: &mut DataTable, config: &TimeConversionConfig) -> DataResult<DerivedColumn> {
    convert_time_on(table, config, Local::now().date_naive())
}

/// [`convert_time`] with an explicit anchor date for time-only input
pub fn convert_time_on(
    table: &mut DataTable,
    config: &TimeConversionConfig,
    today: NaiveDate,
) -> DataResult<DerivedColumn> {
    if table.row_count() == 0 {
        return Err(DataError::NoRows);
    }

    let unit = config.output_unit;
    let rows = 0..table.row_count();

    let values = match config.mode {
        TimeMode::DateAndTime {
            date_column,
            time_column,
        } => {
            ensure_column(table, date_column)?;
            ensure_column(table, time_column)?;
            scan_with_baseline(
                rows,
                |row| {
                    let date = parse_date(table.cell_or_empty(row, date_column))?;
                    let time = parse_time(table.cell_or_empty(row, time_column))?;
                    Some(date.and_time(time))
                },
                |base, at| unit.from_seconds(elapsed_seconds(base, at)),
            )
        }
        TimeMode::TimeOnly { source_column } => {
            ensure_column(table, source_column)?;
            scan_with_baseline(
                rows,
                |row| parse_time(table.cell_or_empty(row, source_column)).map(|t| today.and_time(t)),
                |base, at| {
                    // Overnight runs: a clock reading before the baseline belongs to the next day
                    let at = if at < base { *at + Duration::days(1) } else { *at };
                    unit.from_seconds(elapsed_seconds(base, &at))
                },
            )
        }
    };

    let (cells, processed_rows) = render_cells(&values);
    let column_name = config.output_column_name();
    let definition = ColumnDefinition::named(column_name.clone())
        .with_type(ColumnType::Time)
        .with_unit(unit.as_str());
    let column_index = table.push_column_with_cells(definition, cells);

    tracing::debug!(
        column = %column_name,
        rows = table.row_count(),
        processed = processed_rows,
        "Converted time column"
    );

    Ok(DerivedColumn {
        column_index,
        column_name,
        processed_rows,
    })
}

// ============================================================================
// Pressure Drop
// ============================================================================

/// Locate the pressure column: Pressure-typed first, then a header match
pub fn find_pressure_column(table: &DataTable) -> Option<usize> {
    table.find_column_by_type(ColumnType::Pressure).or_else(|| {
        table.columns().iter().position(|column| {
            let name = column.name();
            name.contains(PRESSURE_HEADER_KEYWORD)
                || name.to_lowercase().contains(PRESSURE_HEADER_KEYWORD_EN)
        })
    })
}

/// Append `initial pressure - pressure` for every row
pub fn compute_pressure_drop(table: &mut DataTable) -> DataResult<DerivedColumn> {
    if table.row_count() == 0 {
        return Err(DataError::NoRows);
    }

    let source = find_pressure_column(table).ok_or(DataError::NoPressureColumn)?;
    let unit = table
        .definition(source)
        .map(|d| d.unit.clone())
        .unwrap_or_default();

    let values = scan_with_baseline(
        0..table.row_count(),
        |row| parse_number(table.cell_or_empty(row, source)),
        |initial, pressure| initial - pressure,
    );

    let (cells, processed_rows) = render_cells(&values);
    let column_name = format!("{}{}{}", PRESSURE_DROP_COLUMN_NAME, UNIT_SEPARATOR, unit);
    let definition = ColumnDefinition::named(column_name.clone())
        .with_type(ColumnType::PressureDrop)
        .with_unit(unit);
    let column_index = table.push_column_with_cells(definition, cells);

    tracing::debug!(
        source_column = source,
        processed = processed_rows,
        "Computed pressure drop"
    );

    Ok(DerivedColumn {
        column_index,
        column_name,
        processed_rows,
    })
}
