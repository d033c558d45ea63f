//! Group-and-count over one field of the dataset.

use std::collections::{BTreeMap, HashMap};

use rtfmri_model::{CategoryIndex, Dataset, FieldCatalog, Result, StudyRecord};

fn count_column<'a, I>(field: &str, column: usize, records: I) -> CategoryIndex
where
    I: IntoIterator<Item = &'a StudyRecord>,
{
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        let Some(value) = record.value_at(column) else {
            continue;
        };
        match positions.get(value) {
            Some(&pos) => counts[pos].1 += 1,
            None => {
                positions.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }
    CategoryIndex::from_first_seen(field, counts)
}

/// Counts the distinct values of `field` over the whole dataset.
///
/// An empty dataset yields an empty index.
///
/// # Errors
///
/// [`ViewError::UnknownField`](rtfmri_model::ViewError::UnknownField) when the
/// dataset has no such column.
pub fn compute_index(dataset: &Dataset, field: &str) -> Result<CategoryIndex> {
    let column = dataset.require_field(field)?;
    Ok(count_column(field, column, dataset))
}

/// Counts the distinct values of `field` over a subsequence of `dataset`.
pub fn compute_index_over<'a, I>(
    dataset: &Dataset,
    field: &str,
    records: I,
) -> Result<CategoryIndex>
where
    I: IntoIterator<Item = &'a StudyRecord>,
{
    let column = dataset.require_field(field)?;
    Ok(count_column(field, column, records))
}

/// Precomputed whole-dataset indexes for every catalog field.
///
/// Built once per dataset and only read afterwards, so sessions can share it
/// behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct IndexCache {
    indexes: BTreeMap<String, CategoryIndex>,
}

impl IndexCache {
    /// # Errors
    ///
    /// Fails on the first catalog field the dataset does not have.
    pub fn build(dataset: &Dataset, catalog: &FieldCatalog) -> Result<Self> {
        let mut indexes = BTreeMap::new();
        for field in catalog.fields() {
            indexes.insert(field.to_string(), compute_index(dataset, field)?);
        }
        Ok(Self { indexes })
    }

    pub fn get(&self, field: &str) -> Option<&CategoryIndex> {
        self.indexes.get(field)
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rtfmri_model::ViewError;

    use super::*;

    fn dataset(rows: &[(&str, &str)]) -> Dataset {
        Dataset::new(
            vec!["vendor".to_string(), "magnet".to_string()],
            rows.iter()
                .map(|(vendor, magnet)| vec![(*vendor).to_string(), (*magnet).to_string()])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn counts_descending_with_first_seen_ties() {
        let ds = dataset(&[
            ("GE", "3T"),
            ("Philips", "3T"),
            ("Siemens", "1.5T"),
            ("Philips", "3T"),
            ("GE", "7T"),
            ("Siemens", "3T"),
            ("Siemens", "3T"),
        ]);
        let index = compute_index(&ds, "vendor").unwrap();
        let values: Vec<&str> = index.values().collect();
        assert_eq!(values, vec!["Siemens", "GE", "Philips"]);
        assert_eq!(index.total(), ds.len());
    }

    #[test]
    fn empty_dataset_gives_empty_index() {
        let ds = dataset(&[]);
        let index = compute_index(&ds, "magnet").unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn unknown_field_fails() {
        let ds = dataset(&[("GE", "3T")]);
        assert_eq!(
            compute_index(&ds, "software"),
            Err(ViewError::unknown_field("software"))
        );
    }

    #[test]
    fn subset_index_counts_only_given_records() {
        let ds = dataset(&[("GE", "3T"), ("Siemens", "1.5T"), ("Siemens", "3T")]);
        let siemens = ds.iter().filter(|r| r.get("vendor") == Some("Siemens"));
        let index = compute_index_over(&ds, "magnet", siemens).unwrap();
        assert_eq!(index.total(), 2);
        assert_eq!(index.count("1.5T"), 1);
        assert_eq!(index.count("3T"), 1);
    }

    #[test]
    fn cache_covers_every_catalog_field() {
        let ds = dataset(&[("GE", "3T")]);
        let catalog = FieldCatalog::new([("vendor", "Vendor"), ("magnet", "Field strength")]);
        let cache = IndexCache::build(&ds, &catalog).unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("magnet").unwrap().count("3T"), 1);
        let missing = FieldCatalog::new([("software", "Software")]);
        assert!(IndexCache::build(&ds, &missing).is_err());
    }
}
