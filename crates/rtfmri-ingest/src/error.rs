//! Error types for dataset ingestion.

use std::path::PathBuf;
use thiserror::Error;

use rtfmri_model::DatasetError;

/// Errors that abort loading the study dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to open or read the source.
    #[error("failed to read dataset {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited text.
    #[error("failed to parse dataset {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// No header row was found.
    #[error("dataset has no header row: {path}")]
    MissingHeader { path: PathBuf },

    /// Header present but no study records follow it.
    #[error("dataset has no records: {path}")]
    EmptyDataset { path: PathBuf },

    /// A record has more values than the header has columns.
    #[error("record {record} in {path} has {found} values, expected at most {expected}")]
    RowWidth {
        path: PathBuf,
        record: usize,
        expected: usize,
        found: usize,
    },

    /// The cleaned table could not be assembled.
    #[error("invalid dataset {path}: {source}")]
    Dataset {
        path: PathBuf,
        #[source]
        source: DatasetError,
    },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
