use std::path::PathBuf;

use serde::Serialize;

use rtfmri_ingest::DroppedColumn;

/// One row of `rtfmri fields`.
#[derive(Debug, Serialize)]
pub struct FieldSummary {
    pub field: String,
    pub label: String,
    pub distinct: usize,
    pub top_value: Option<String>,
    pub top_count: usize,
}

#[derive(Debug, Serialize)]
pub struct FieldsReport {
    pub dataset: PathBuf,
    pub studies: usize,
    pub fields: Vec<FieldSummary>,
    pub dropped: Vec<DroppedColumn>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResult {
    pub csv: String,
    pub data_uri: Option<String>,
    pub output: Option<PathBuf>,
    pub sentences: Vec<String>,
}
