//! Delimited text parsing
//!
//! Parses CSV/TSV-like text into a header row and data rows under
//! user-chosen formatting rules: encoding, delimiter, 1-based start row and
//! an optional 1-based header row.
//!
//! ## Row selection
//!
//! Line `i` (0-based) is consulted when `i >= start_row - 1`, or when the
//! header is enabled and `i == header_row - 1`. The header line therefore
//! takes priority over the start-row skip, and the two offsets are
//! independent: a header below the first data line is honoured as-is.

use crate::constants::DEFAULT_HEADER_PREFIX;
use crate::data::encoding::decode_text;
use crate::data::error::DataResult;
use crate::types::{DelimiterSelector, EncodingSelector, ImportSettings};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Role of a consulted line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowRole {
    Header,
    Data,
}

/// The start-row / header-row selection rule, shared by text and
/// spreadsheet imports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowSelection {
    /// 0-based first data line
    start_index: usize,
    /// 0-based header line, `None` when the header is disabled
    header_index: Option<usize>,
}

impl RowSelection {
    /// Build from 1-based offsets; a 0 offset is treated as 1.
    pub fn new(start_row: usize, use_header: bool, header_row: usize) -> Self {
        Self {
            start_index: start_row.saturating_sub(1),
            header_index: use_header.then(|| header_row.saturating_sub(1)),
        }
    }

    /// Role of line `index`, `None` when the line is skipped
    pub fn role(&self, index: usize) -> Option<RowRole> {
        if self.header_index == Some(index) {
            Some(RowRole::Header)
        } else if index >= self.start_index {
            Some(RowRole::Data)
        } else {
            None
        }
    }

    /// Apply the rule to already-split rows (spreadsheet path).
    ///
    /// Unlike text lines, empty spreadsheet rows are kept.
    pub fn apply<I>(&self, rows: I) -> ParsedTable
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut header = None;
        let mut data = Vec::new();
        for (i, fields) in rows.into_iter().enumerate() {
            match self.role(i) {
                Some(RowRole::Header) if header.is_none() => header = Some(fields),
                Some(RowRole::Header) | None => {}
                Some(RowRole::Data) => data.push(fields),
            }
        }
        ParsedTable::finish(header, data)
    }
}

impl Default for RowSelection {
    fn default() -> Self {
        Self::new(1, true, 1)
    }
}

/// Header and data rows produced by an import
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedTable {
    /// Header labels; synthesized as "Col N" when no header line was found
    pub header: Vec<String>,
    /// Data rows in file order, possibly ragged
    pub rows: Vec<Vec<String>>,
    /// Whether `header` came from the input
    pub has_header: bool,
}

impl ParsedTable {
    fn finish(header: Option<Vec<String>>, rows: Vec<Vec<String>>) -> Self {
        match header {
            Some(header) if !header.is_empty() => Self {
                header,
                rows,
                has_header: true,
            },
            _ => {
                let width = rows.iter().map(Vec::len).max().unwrap_or(0);
                Self {
                    header: default_headers(0, width),
                    rows,
                    has_header: false,
                }
            }
        }
    }

    /// Widest of the header and every data row
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

/// Default labels "Col {from+1}" .. "Col {to}"
pub fn default_headers(from: usize, to: usize) -> Vec<String> {
    (from..to).map(default_header).collect()
}

/// Default label for the 0-based column `index`
pub fn default_header(index: usize) -> String {
    format!("{} {}", DEFAULT_HEADER_PREFIX, index + 1)
}

/// Parse raw file bytes.
pub fn parse(
    raw: &[u8],
    encoding: EncodingSelector,
    delimiter: DelimiterSelector,
    start_row: usize,
    use_header: bool,
    header_row: usize,
) -> ParsedTable {
    let text = decode_text(raw, encoding);
    parse_content(
        &text,
        delimiter,
        RowSelection::new(start_row, use_header, header_row),
    )
}

/// Parse raw bytes with the encoding, delimiter and offsets of `settings`
pub fn parse_bytes(raw: &[u8], settings: &ImportSettings) -> ParsedTable {
    parse(
        raw,
        settings.encoding,
        settings.delimiter,
        settings.start_row,
        settings.use_header,
        settings.header_row,
    )
}

/// Read and parse the file named by `settings`
pub fn parse_file(settings: &ImportSettings) -> DataResult<ParsedTable> {
    let raw = std::fs::read(&settings.file_path)?;
    let parsed = parse_bytes(&raw, settings);
    tracing::debug!(
        path = %settings.file_path.display(),
        rows = parsed.rows.len(),
        columns = parsed.column_count(),
        has_header = parsed.has_header,
        "Parsed delimited file"
    );
    Ok(parsed)
}

/// Parse already-decoded text
pub fn parse_content(text: &str, delimiter: DelimiterSelector, selection: RowSelection) -> ParsedTable {
    let lines = split_lines(text);
    let delimiter = resolve_delimiter(delimiter, &lines);

    let mut header = None;
    let mut rows = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some(role) = selection.role(i) else {
            continue;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = split_fields(line, delimiter);
        match role {
            RowRole::Header => {
                if header.is_none() {
                    header = Some(fields);
                }
            }
            RowRole::Data => rows.push(fields),
        }
    }

    ParsedTable::finish(header, rows)
}

/// Split text into lines; `\n`, `\r\n` and a bare `\r` all end a line.
///
/// A trailing terminator does not produce an extra empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }

    lines
}

/// Pick the delimiter: explicit choice, or auto-detect from the first
/// non-empty line.
pub fn resolve_delimiter(selector: DelimiterSelector, lines: &[&str]) -> char {
    selector.as_char().unwrap_or_else(|| {
        lines
            .iter()
            .find(|line| !line.trim().is_empty())
            .map(|line| detect_delimiter(line))
            .unwrap_or(',')
    })
}

/// Tab when the line has strictly more tabs than commas, else comma
pub fn detect_delimiter(line: &str) -> char {
    let tab_count = line.matches('\t').count();
    let comma_count = line.matches(',').count();
    if tab_count > comma_count { '\t' } else { ',' }
}

/// Split a line into trimmed, unquoted fields.
///
/// Delimiters inside quotes are not protected: every occurrence splits.
pub fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    line.split(delimiter)
        .map(|field| unquote(field).to_string())
        .collect()
}

/// Remove one layer of surrounding quotes from a trimmed field
fn unquote(s: &str) -> &str {
    let trimmed = s.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Read the first `max_lines` raw lines of a file for the import preview
pub fn read_preview_bytes(path: &Path, max_lines: usize) -> DataResult<Vec<u8>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buffer = Vec::new();

    for _ in 0..max_lines {
        let read = reader.read_until(b'\n', &mut buffer)?;
        if read == 0 {
            break;
        }
    }

    Ok(buffer)
}
