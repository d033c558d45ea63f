//! Study records and the immutable dataset that holds them.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{DatasetError, ViewError};

/// Field identifier of the author column.
pub const AUTHOR_FIELD: &str = "author";
/// Field identifier of the DOI column.
pub const DOI_FIELD: &str = "doi";

/// One row of the dataset.
///
/// Values are stored positionally; the column names are shared with the owning
/// [`Dataset`] so every record carries the identical field set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyRecord {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl StudyRecord {
    /// Returns the value of `field`, or `None` when the dataset has no such column.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|column| column == field)
            .map(|idx| self.values[idx].as_str())
    }

    /// Returns the value at a column position.
    pub fn value_at(&self, idx: usize) -> Option<&str> {
        self.values.get(idx).map(String::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.get(AUTHOR_FIELD)
    }

    pub fn doi(&self) -> Option<&str> {
        self.get(DOI_FIELD)
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Iterates `(field, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

impl Serialize for StudyRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (field, value) in self.fields() {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// Ordered, read-only table of study records.
///
/// Insertion order is source order. There is no key beyond row position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Arc<[String]>,
    records: Vec<StudyRecord>,
}

impl Dataset {
    /// Builds a dataset from a header and positional rows.
    ///
    /// Every row must have exactly one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, DatasetError> {
        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(DatasetError::DuplicateColumn {
                    column: column.clone(),
                });
            }
        }
        let columns: Arc<[String]> = columns.into();
        let mut records = Vec::with_capacity(rows.len());
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != columns.len() {
                return Err(DatasetError::RowWidth {
                    row,
                    expected: columns.len(),
                    found: values.len(),
                });
            }
            records.push(StudyRecord {
                columns: Arc::clone(&columns),
                values,
            });
        }
        Ok(Self { columns, records })
    }

    /// A dataset with the given columns and no records.
    pub fn empty(columns: Vec<String>) -> Result<Self, DatasetError> {
        Self::new(columns, Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_index(&self, field: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.column_index(field).is_some()
    }

    /// Resolves a field to its column position or fails with [`ViewError::UnknownField`].
    pub fn require_field(&self, field: &str) -> Result<usize, ViewError> {
        self.column_index(field)
            .ok_or_else(|| ViewError::unknown_field(field))
    }

    pub fn records(&self) -> &[StudyRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StudyRecord> {
        self.records.iter()
    }

    pub fn get(&self, row: usize) -> Option<&StudyRecord> {
        self.records.get(row)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a StudyRecord;
    type IntoIter = std::slice::Iter<'a, StudyRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    fn row(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn records_share_the_dataset_columns() {
        let dataset = Dataset::new(
            cols(&["author", "vendor", "doi"]),
            vec![
                row(&["Doe et al. (2019)", "Siemens", "10.1/a"]),
                row(&["Roe et al. (2020)", "GE", "10.1/b"]),
            ],
        )
        .unwrap();

        assert_eq!(dataset.len(), 2);
        let first = dataset.get(0).unwrap();
        assert_eq!(first.get("vendor"), Some("Siemens"));
        assert_eq!(first.author(), Some("Doe et al. (2019)"));
        assert_eq!(first.doi(), Some("10.1/a"));
        assert_eq!(first.get("magnet"), None);
        let pairs: Vec<(&str, &str)> = dataset.get(1).unwrap().fields().collect();
        assert_eq!(
            pairs,
            vec![("author", "Roe et al. (2020)"), ("vendor", "GE"), ("doi", "10.1/b")]
        );
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Dataset::new(cols(&["a", "b"]), vec![row(&["1", "2"]), row(&["3"])])
            .unwrap_err();
        assert_eq!(
            err,
            DatasetError::RowWidth {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Dataset::empty(cols(&["a", "a"])).unwrap_err();
        assert!(matches!(err, DatasetError::DuplicateColumn { column } if column == "a"));
    }

    #[test]
    fn require_field_reports_unknown_fields() {
        let dataset = Dataset::empty(cols(&["vendor"])).unwrap();
        assert_eq!(dataset.require_field("vendor"), Ok(0));
        assert_eq!(
            dataset.require_field("magnet"),
            Err(ViewError::unknown_field("magnet"))
        );
    }
}
