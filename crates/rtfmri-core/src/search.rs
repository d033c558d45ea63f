//! Free-text search over the literature table.

use rtfmri_model::{Dataset, StudyRecord};

/// Returns the records in which any field contains `query`, ignoring case.
///
/// The query is a plain substring, not a pattern. An empty query matches every
/// record, so `search(dataset, "")` yields the dataset unchanged.
///
/// Values are matched as stored. A DOI is searched as the bare identifier, not
/// as the `https://doi.org/` link the tables render it as.
pub fn search<'a>(dataset: &'a Dataset, query: &str) -> Vec<&'a StudyRecord> {
    if query.is_empty() {
        return dataset.iter().collect();
    }
    let needle = query.to_lowercase();
    dataset
        .iter()
        .filter(|record| record_matches(record, &needle))
        .collect()
}

/// `needle` must already be lowercased.
fn record_matches(record: &StudyRecord, needle: &str) -> bool {
    record
        .values()
        .iter()
        .any(|value| value.to_lowercase().contains(needle))
}
