//! Turns the raw study table into a [`Dataset`].
//!
//! A column is kept only if every record has a value for it. One empty cell in
//! one record removes that column for all records. This is probably not what
//! anyone wants from a data-quality point of view, so every dropped column is
//! reported and logged at `warn`.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use rtfmri_model::Dataset;

use crate::error::{IngestError, Result};
use crate::table::{RawTable, read_raw_table, read_raw_table_from_path};

/// Default location of the study table, relative to the working directory.
pub const DEFAULT_DATASET_PATH: &str =
    "assets/rtfMRI_methods_review_included_studies_procsteps.txt";

/// A column removed because at least one record had no value for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedColumn {
    pub name: String,
    /// Number of records with an empty cell in this column.
    pub missing: usize,
}

/// The loaded dataset plus what the column policy did to it.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub source: PathBuf,
    pub dataset: Dataset,
    pub dropped: Vec<DroppedColumn>,
}

/// Applies the drop-incomplete-columns policy to a raw table.
pub fn drop_incomplete_columns(
    raw: RawTable,
) -> (Vec<String>, Vec<Vec<String>>, Vec<DroppedColumn>) {
    let mut keep = Vec::with_capacity(raw.headers.len());
    let mut dropped = Vec::new();
    for (idx, name) in raw.headers.iter().enumerate() {
        let missing = raw.missing_in_column(idx);
        if missing == 0 {
            keep.push(idx);
        } else {
            dropped.push(DroppedColumn {
                name: name.clone(),
                missing,
            });
        }
    }
    let headers = keep.iter().map(|&idx| raw.headers[idx].clone()).collect();
    let rows = raw
        .rows
        .into_iter()
        .map(|row| keep.iter().map(|&idx| row[idx].clone()).collect())
        .collect();
    (headers, rows, dropped)
}

fn build_dataset(raw: RawTable, source: &Path) -> Result<LoadedDataset> {
    if raw.rows.is_empty() {
        return Err(IngestError::EmptyDataset {
            path: source.to_path_buf(),
        });
    }
    let (headers, rows, dropped) = drop_incomplete_columns(raw);
    for column in &dropped {
        warn!(
            column = %column.name,
            missing = column.missing,
            "dropping column with missing values from every record"
        );
    }
    let dataset = Dataset::new(headers, rows).map_err(|source_err| IngestError::Dataset {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    info!(
        source = %source.display(),
        records = dataset.len(),
        columns = dataset.columns().len(),
        dropped = dropped.len(),
        "dataset loaded"
    );
    Ok(LoadedDataset {
        source: source.to_path_buf(),
        dataset,
        dropped,
    })
}

/// Loads the study table from a tab-separated file.
///
/// # Errors
///
/// Fails when the file cannot be read, is malformed, or holds no records.
pub fn load_dataset(path: &Path) -> Result<LoadedDataset> {
    let raw = read_raw_table_from_path(path)?;
    build_dataset(raw, path)
}

/// Loads the study table from any reader; `source` labels errors and logs.
pub fn load_dataset_from_reader<R: Read>(reader: R, source: &Path) -> Result<LoadedDataset> {
    let raw = read_raw_table(reader, source)?;
    build_dataset(raw, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<LoadedDataset> {
        load_dataset_from_reader(text.as_bytes(), Path::new("inline.txt"))
    }

    #[test]
    fn single_missing_value_drops_whole_column() {
        let loaded =
            load("author\tvendor\tsoftware\rDoe\tSiemens\tTBV\rRoe\tGE\t\r").unwrap();
        assert_eq!(loaded.dataset.columns(), ["author", "vendor"]);
        assert_eq!(
            loaded.dropped,
            vec![DroppedColumn {
                name: "software".to_string(),
                missing: 1
            }]
        );
        assert_eq!(loaded.dataset.len(), 2);
        assert_eq!(loaded.dataset.get(0).unwrap().get("software"), None);
    }

    #[test]
    fn header_only_is_empty() {
        let err = load("author\tvendor\n").unwrap_err();
        assert!(matches!(err, IngestError::EmptyDataset { .. }));
    }

    #[test]
    fn complete_table_keeps_every_column() {
        let loaded = load("a\tb\n1\t2\n3\t4\n").unwrap();
        assert!(loaded.dropped.is_empty());
        assert_eq!(loaded.dataset.columns(), ["a", "b"]);
    }
}
