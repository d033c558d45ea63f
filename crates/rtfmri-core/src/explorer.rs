//! Shared, read-only context handed to every session.

use std::sync::Arc;

use rtfmri_model::{CategoryIndex, Dataset, FieldCatalog, Result, StudyRecord};

use crate::index::IndexCache;
use crate::search::search;
use crate::view::{CrossFilterView, DEFAULT_MAX_ROWS};

/// Dataset, catalogs and precomputed indexes, loaded once and shared.
///
/// Cloning is cheap; all clones point at the same immutable data, so an
/// `Explorer` can be handed to any number of concurrent sessions.
#[derive(Debug, Clone)]
pub struct Explorer {
    dataset: Arc<Dataset>,
    plot_catalog: Arc<FieldCatalog>,
    column_catalog: Arc<FieldCatalog>,
    indexes: Arc<IndexCache>,
    max_rows: usize,
}

impl Explorer {
    /// Uses the built-in catalogs, restricted to the fields the dataset kept.
    ///
    /// # Errors
    ///
    /// Fails if [`IndexCache::build`] fails. The plot catalog is trimmed to the
    /// dataset's columns first, so a dataset with too few plot fields still
    /// loads and [`Explorer::open_view`] reports it instead.
    pub fn new(dataset: Dataset) -> Result<Self> {
        let plot = FieldCatalog::plot().retain_present(&dataset);
        Self::with_catalogs(dataset, plot, FieldCatalog::columns())
    }

    /// # Errors
    ///
    /// Fails if a plot catalog field is missing from the dataset.
    pub fn with_catalogs(
        dataset: Dataset,
        plot_catalog: FieldCatalog,
        column_catalog: FieldCatalog,
    ) -> Result<Self> {
        let indexes = IndexCache::build(&dataset, &plot_catalog)?;
        Ok(Self {
            dataset: Arc::new(dataset),
            plot_catalog: Arc::new(plot_catalog),
            column_catalog: Arc::new(column_catalog),
            indexes: Arc::new(indexes),
            max_rows: DEFAULT_MAX_ROWS,
        })
    }

    #[must_use]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Opens an independent cross-filter session in its initial state.
    ///
    /// # Errors
    ///
    /// [`ViewError::CatalogTooSmall`](rtfmri_model::ViewError::CatalogTooSmall)
    /// when fewer than two plot fields survived loading.
    pub fn open_view(&self) -> Result<CrossFilterView> {
        Ok(CrossFilterView::with_shared(
            Arc::clone(&self.dataset),
            Arc::clone(&self.plot_catalog),
            Arc::clone(&self.indexes),
        )?
        .with_max_rows(self.max_rows))
    }

    pub fn search(&self, query: &str) -> Vec<&StudyRecord> {
        search(&self.dataset, query)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn plot_catalog(&self) -> &FieldCatalog {
        &self.plot_catalog
    }

    pub fn column_catalog(&self) -> &FieldCatalog {
        &self.column_catalog
    }

    /// Whole-dataset index of a plot catalog field.
    pub fn index(&self, field: &str) -> Option<&CategoryIndex> {
        self.indexes.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn explorer_is_shareable() {
        assert_send_sync::<Explorer>();
        assert_send_sync::<CrossFilterView>();
    }

    #[test]
    fn sessions_are_independent() {
        let dataset = Dataset::new(
            vec!["vendor".into(), "magnet".into(), "notes".into()],
            vec![
                vec!["Siemens".into(), "3T".into(), "x".into()],
                vec!["GE".into(), "1.5T".into(), "y".into()],
            ],
        )
        .unwrap();
        let explorer = Explorer::new(dataset).unwrap();
        let fields: Vec<&str> = explorer.plot_catalog().fields().collect();
        assert_eq!(fields, vec!["vendor", "magnet"]);

        let mut first = explorer.open_view().unwrap();
        let second = explorer.open_view().unwrap();
        first.hover(Some("GE")).unwrap();
        assert!(first.secondary_aggregate().is_some());
        assert!(second.secondary_aggregate().is_none());
    }

    #[test]
    fn too_few_plot_fields_fail_when_a_view_opens() {
        let dataset = Dataset::new(
            vec!["author".into(), "vendor".into()],
            vec![vec!["Doe".into(), "Siemens".into()]],
        )
        .unwrap();
        let explorer = Explorer::new(dataset).unwrap();
        assert_eq!(explorer.plot_catalog().len(), 1);
        assert!(matches!(
            explorer.open_view(),
            Err(rtfmri_model::ViewError::CatalogTooSmall { fields: 1 })
        ));
    }
}
