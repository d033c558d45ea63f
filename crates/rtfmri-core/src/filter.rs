//! Exact-value filtering used by the drill-down views.

use rtfmri_model::{Dataset, Result, StudyRecord};

/// Row positions whose `field` equals `value`, in dataset order.
///
/// # Errors
///
/// Fails when the dataset has no column named `field`.
pub fn matching_rows(dataset: &Dataset, field: &str, value: &str) -> Result<Vec<usize>> {
    let column = dataset.require_field(field)?;
    Ok(dataset
        .iter()
        .enumerate()
        .filter(|(_, record)| record.value_at(column) == Some(value))
        .map(|(row, _)| row)
        .collect())
}

/// Records whose `field` equals `value`, in dataset order.
pub fn filter_equals<'a>(
    dataset: &'a Dataset,
    field: &str,
    value: &str,
) -> Result<Vec<&'a StudyRecord>> {
    let column = dataset.require_field(field)?;
    Ok(dataset
        .iter()
        .filter(|record| record.value_at(column) == Some(value))
        .collect())
}
