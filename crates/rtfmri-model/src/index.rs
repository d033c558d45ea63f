//! Per-field value distributions.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
}

/// Distinct values of one field with their record counts.
///
/// Entries are ordered by descending count; equal counts keep the order in
/// which the values were first seen in the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryIndex {
    field: String,
    entries: Vec<CategoryCount>,
}

impl CategoryIndex {
    /// An index with no values, e.g. for an empty dataset.
    pub fn empty(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            entries: Vec::new(),
        }
    }

    /// Builds an index from counts listed in first-seen order.
    pub fn from_first_seen<I>(field: impl Into<String>, counts: I) -> Self
    where
        I: IntoIterator<Item = (String, usize)>,
    {
        let mut entries: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(value, count)| CategoryCount { value, count })
            .collect();
        // sort_by is stable, so ties stay in first-seen order
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self {
            field: field.into(),
            entries,
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn entries(&self) -> &[CategoryCount] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryCount> {
        self.entries.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.value.as_str())
    }

    /// Count for `value`, zero when the value does not occur.
    pub fn count(&self, value: &str) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.value == value)
            .map_or(0, |entry| entry.count)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.iter().any(|entry| entry.value == value)
    }

    /// Sum of all counts; equals the number of indexed records.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a CategoryIndex {
    type Item = &'a CategoryCount;
    type IntoIter = std::slice::Iter<'a, CategoryCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
