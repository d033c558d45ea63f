use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// Delimiter of the study source file.
pub const FIELD_DELIMITER: u8 = b'\t';

/// Tab-separated text as read, before any missing-value policy is applied.
///
/// Short rows are padded with empty cells so every row has one cell per header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Number of empty cells in column `idx`.
    pub fn missing_in_column(&self, idx: usize) -> usize {
        self.rows
            .iter()
            .filter(|row| row.get(idx).is_none_or(|value| value.is_empty()))
            .count()
    }
}

fn normalize_header(raw: &str, idx: usize) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    if normalized.is_empty() {
        format!("Unnamed: {idx}")
    } else {
        normalized
    }
}

/// Surrounding whitespace is not part of a value, so a blank cell is missing.
/// Tokens such as `NA` or `null` are ordinary values.
fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Reads tab-separated text with a header row.
///
/// Records may be terminated by `\r`, `\n` or `\r\n`. Fully blank lines are
/// skipped. `source` is only used in error messages.
pub fn read_raw_table<R: Read>(reader: R, source: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for (record_idx, record) in reader.records().enumerate() {
        let record = record.map_err(|source_err| IngestError::CsvParse {
            path: source.to_path_buf(),
            source: source_err,
        })?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        if headers.is_none() {
            headers = Some(
                record
                    .iter()
                    .enumerate()
                    .map(|(idx, value)| normalize_header(value, idx))
                    .collect(),
            );
            continue;
        }
        let expected = headers.as_ref().map_or(0, Vec::len);
        if row.len() > expected {
            return Err(IngestError::RowWidth {
                path: source.to_path_buf(),
                record: record_idx,
                expected,
                found: row.len(),
            });
        }
        let mut padded = row;
        padded.resize(expected, String::new());
        rows.push(padded);
    }
    let headers = headers.ok_or_else(|| IngestError::MissingHeader {
        path: source.to_path_buf(),
    })?;
    Ok(RawTable { headers, rows })
}

/// Reads a tab-separated file from disk.
pub fn read_raw_table_from_path(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    read_raw_table(file, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Result<RawTable> {
        read_raw_table(text.as_bytes(), Path::new("inline.txt"))
    }

    #[test]
    fn carriage_return_terminated_records() {
        let table = read("author\tvendor\rDoe\tSiemens\rRoe\tGE\r").unwrap();
        assert_eq!(table.headers, vec!["author", "vendor"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1], vec!["Roe", "GE"]);
    }

    #[test]
    fn trims_cells_and_strips_bom() {
        let table = read("\u{feff}author \t vendor\n  Doe \tSiemens  \n").unwrap();
        assert_eq!(table.headers, vec!["author", "vendor"]);
        assert_eq!(table.rows[0], vec!["Doe", "Siemens"]);
    }

    #[test]
    fn pads_short_rows_and_counts_missing() {
        let table = read("a\tb\tc\n1\t2\n4\t\t6\n").unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", ""]);
        assert_eq!(table.missing_in_column(0), 0);
        assert_eq!(table.missing_in_column(1), 1);
        assert_eq!(table.missing_in_column(2), 1);
    }

    #[test]
    fn skips_blank_lines() {
        let table = read("\n\na\tb\n\n1\t2\n\t\n").unwrap();
        assert_eq!(table.headers, vec!["a", "b"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "2".to_string()]]);
    }

    #[test]
    fn names_blank_headers() {
        let table = read("a\t\tc\n1\t2\t3\n").unwrap();
        assert_eq!(table.headers, vec!["a", "Unnamed: 1", "c"]);
    }

    #[test]
    fn rejects_overlong_rows() {
        let err = read("a\tb\n1\t2\t3\n").unwrap_err();
        assert!(matches!(
            err,
            IngestError::RowWidth {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn blank_input_has_no_header() {
        let err = read("\n\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingHeader { .. }));
    }
}
