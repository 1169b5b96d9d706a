//! Delimited text parser tests

use crate::helpers::write_fixture;
use welltest_editor::data::{self, RowSelection, detect_delimiter, parse_content};
use welltest_editor::types::{DelimiterSelector, EncodingSelector, ImportSettings};

// ============================================================================
// Header and row counts
// ============================================================================

#[test]
fn test_header_width_and_row_count() {
    let raw = b"time,pressure,temperature\n10:00,100,20\n\n10:30,90,21\n10:45,85,22\n";
    let parsed = data::parse(
        raw,
        EncodingSelector::Utf8,
        DelimiterSelector::Auto,
        1,
        true,
        1,
    );

    let first_line = "time,pressure,temperature";
    assert_eq!(parsed.header.len(), first_line.matches(',').count() + 1);
    assert_eq!(parsed.rows.len(), 3);
    assert!(parsed.has_header);
}

#[test]
fn test_empty_input() {
    let parsed = data::parse(b"", EncodingSelector::Auto, DelimiterSelector::Auto, 1, true, 1);
    assert!(parsed.header.is_empty());
    assert!(parsed.rows.is_empty());
}

#[test]
fn test_no_header_synthesizes_labels() {
    let parsed = parse_content(
        "1,2\n3,4,5\n",
        DelimiterSelector::Comma,
        RowSelection::new(1, false, 1),
    );

    assert_eq!(parsed.header, vec!["Col 1", "Col 2", "Col 3"]);
    assert_eq!(parsed.rows[1], vec!["3", "4", "5"]);
    assert!(!parsed.has_header);
}

// ============================================================================
// Row selection
// ============================================================================

#[test]
fn test_header_row_below_start_row_takes_priority() {
    let text = "a,b\nc,d\nx,y\ne,f\n";
    let parsed = parse_content(text, DelimiterSelector::Comma, RowSelection::new(1, true, 3));

    assert_eq!(parsed.header, vec!["x", "y"]);
    assert_eq!(parsed.rows, vec![vec!["a", "b"], vec!["c", "d"], vec!["e", "f"]]);
}

#[test]
fn test_preamble_skipped() {
    let text = "Well: X-1\nOperator: test\ntime,p\n10:00,100\n";
    let parsed = parse_content(text, DelimiterSelector::Auto, RowSelection::new(4, true, 3));

    assert_eq!(parsed.header, vec!["time", "p"]);
    assert_eq!(parsed.rows, vec![vec!["10:00", "100"]]);
}

// ============================================================================
// Delimiters and fields
// ============================================================================

#[test]
fn test_delimiter_detection() {
    assert_eq!(detect_delimiter("a\tb\tc,d"), '\t');
    assert_eq!(detect_delimiter("a\tb,c"), ',');
    assert_eq!(detect_delimiter("a,b,c\td"), ',');
    assert_eq!(detect_delimiter("abc"), ',');
}

#[test]
fn test_tab_input_auto() {
    let parsed = parse_content(
        "time\tp\r\n10:00\t100\r\n",
        DelimiterSelector::Auto,
        RowSelection::default(),
    );
    assert_eq!(parsed.header, vec!["time", "p"]);
    assert_eq!(parsed.rows, vec![vec!["10:00", "100"]]);
}

#[test]
fn test_quotes_and_whitespace_stripped() {
    let parsed = parse_content(
        "\"time\" ; \"p\"\n  \"10:00\";  100  \n",
        DelimiterSelector::Semicolon,
        RowSelection::default(),
    );
    assert_eq!(parsed.header, vec!["time", "p"]);
    assert_eq!(parsed.rows, vec![vec!["10:00", "100"]]);
}

#[test]
fn test_gbk_file() {
    // "压力,温度\n1,2\n" in GBK
    let raw: &[u8] = &[
        0xD1, 0xB9, 0xC1, 0xA6, b',', 0xCE, 0xC2, 0xB6, 0xC8, b'\n', b'1', b',', b'2', b'\n',
    ];
    let (_dir, path) = write_fixture("gbk.csv", raw);
    let settings = ImportSettings {
        encoding: EncodingSelector::Gbk,
        ..ImportSettings::for_path(&path)
    };

    let parsed = data::parse_file(&settings).unwrap();
    assert_eq!(parsed.header, vec!["压力", "温度"]);
    assert_eq!(parsed.rows, vec![vec!["1", "2"]]);
}

#[test]
fn test_missing_file_is_io_error() {
    let settings = ImportSettings::for_path("/definitely/not/here.csv");
    let err = data::parse_file(&settings).unwrap_err();
    assert!(matches!(err, welltest_editor::DataError::Io(_)));
}
