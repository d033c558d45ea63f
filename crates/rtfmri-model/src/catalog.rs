//! Hand-authored mappings from field identifiers to display labels.

use serde::{Deserialize, Serialize};

use crate::record::Dataset;

/// Categorical fields offered by the aggregate views and the submission form.
pub const PLOT_FIELDS: &[(&str, &str)] = &[
    ("vendor", "Vendor"),
    ("magnet", "Field strength"),
    ("software", "Software"),
    ("stc", "Slice time correction"),
    ("mc", "3D volume realignment"),
    ("ss", "Spatial smoothing"),
    ("dr", "Drift removal"),
    ("hmp", "Realignment parameter regression"),
    ("ts", "Temporal smoothing"),
    ("ff", "Frequency filtering"),
    ("or", "Outlier removal"),
    ("droi", "Differential ROI"),
    ("resp", "Respiratory noise removal"),
];

/// Labels for every column of the literature table.
pub const COLUMN_FIELDS: &[(&str, &str)] = &[
    ("author", "Author"),
    ("vendor", "Vendor"),
    ("magnet", "Field strength"),
    ("software", "Software"),
    ("stc", "Slice time correction"),
    ("mc", "3D volume realignment"),
    ("ss", "Spatial smoothing"),
    ("dr", "Drift removal"),
    ("hmp", "Realignment parameter regression"),
    ("ts", "Temporal smoothing"),
    ("ff", "Frequency filtering"),
    ("or", "Outlier removal"),
    ("droi", "Differential ROI"),
    ("resp", "Respiratory noise removal"),
    ("doi", "Article DOI"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLabel {
    pub field: String,
    pub label: String,
}

/// Ordered `(field, label)` catalog. Iteration order drives every tie-break
/// that picks "the first other field".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldCatalog {
    entries: Vec<FieldLabel>,
}

impl FieldCatalog {
    /// Builds a catalog, keeping the first occurrence of any repeated field.
    pub fn new<I, F, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (F, L)>,
        F: Into<String>,
        L: Into<String>,
    {
        let mut catalog = Self::default();
        for (field, label) in entries {
            let field = field.into();
            if catalog.contains(&field) {
                continue;
            }
            catalog.entries.push(FieldLabel {
                field,
                label: label.into(),
            });
        }
        catalog
    }

    /// The categorical fields offered by the aggregate views.
    pub fn plot() -> Self {
        Self::new(PLOT_FIELDS.iter().copied())
    }

    /// Labels for all literature table columns.
    pub fn columns() -> Self {
        Self::new(COLUMN_FIELDS.iter().copied())
    }

    pub fn entries(&self) -> &[FieldLabel] {
        &self.entries
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.field.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.iter().any(|entry| entry.field == field)
    }

    pub fn label(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.field == field)
            .map(|entry| entry.label.as_str())
    }

    /// Label of `field`, falling back to the identifier itself.
    pub fn label_or_field<'a>(&'a self, field: &'a str) -> &'a str {
        self.label(field).unwrap_or(field)
    }

    pub fn first(&self) -> Option<&str> {
        self.entries.first().map(|entry| entry.field.as_str())
    }

    /// First field in catalog order that is not `field`.
    pub fn first_other_than(&self, field: &str) -> Option<&str> {
        self.fields().find(|candidate| *candidate != field)
    }

    /// Entries other than `field`, in catalog order.
    pub fn without(&self, field: &str) -> Vec<&FieldLabel> {
        self.entries
            .iter()
            .filter(|entry| entry.field != field)
            .collect()
    }

    /// Catalog restricted to fields that survived loading into `dataset`.
    pub fn retain_present(&self, dataset: &Dataset) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| dataset.has_field(&entry.field))
                .cloned()
                .collect(),
        }
    }
}
