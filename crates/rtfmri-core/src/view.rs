//! The linked cross-filter view: a primary aggregate drives a secondary
//! aggregate on hover and a detail table on click.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use rtfmri_model::{
    CategoryIndex, Dataset, FieldCatalog, FieldLabel, Result, StudyRecord, ViewError,
};

use crate::filter::{filter_equals, matching_rows};
use crate::index::{IndexCache, compute_index_over};
use crate::selection::{Selection, ViewEvent};

/// Default cap on detail table rows.
pub const DEFAULT_MAX_ROWS: usize = 20;

const PRIMARY_TITLE_HINT: &str = "(hover to show options of second feature; click to display studies)";

#[derive(Debug, Clone, PartialEq, Eq)]
struct DetailRows {
    /// Row positions, already truncated to `max_rows`.
    rows: Vec<usize>,
    /// Matches before truncation.
    matched: usize,
}

/// One session's cross-filter state over a shared, read-only dataset.
///
/// Every event is applied atomically: on error the view is left exactly as it
/// was. Applying the same event to the same state always derives the same
/// outputs.
#[derive(Debug, Clone)]
pub struct CrossFilterView {
    dataset: Arc<Dataset>,
    catalog: Arc<FieldCatalog>,
    indexes: Arc<IndexCache>,
    max_rows: usize,
    selection: Selection,
    primary: CategoryIndex,
    secondary: Option<CategoryIndex>,
    detail: Option<DetailRows>,
}

/// Serializable copy of everything the view currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub selection: Selection,
    pub title: String,
    pub primary: CategoryIndex,
    pub secondary_title: Option<String>,
    pub secondary: Option<CategoryIndex>,
    pub detail_heading: Option<String>,
    pub detail_rows: Vec<StudyRecord>,
    pub detail_matches: Option<usize>,
}

impl CrossFilterView {
    /// Builds a view that owns its own index cache.
    ///
    /// # Errors
    ///
    /// Fails if a catalog field is missing from the dataset or the catalog has
    /// fewer than two fields.
    pub fn new(dataset: Arc<Dataset>, catalog: FieldCatalog) -> Result<Self> {
        let indexes = IndexCache::build(&dataset, &catalog)?;
        Self::with_shared(dataset, Arc::new(catalog), Arc::new(indexes))
    }

    /// Builds a view over indexes shared with other sessions.
    ///
    /// `indexes` must have been built from `dataset` and `catalog`.
    pub fn with_shared(
        dataset: Arc<Dataset>,
        catalog: Arc<FieldCatalog>,
        indexes: Arc<IndexCache>,
    ) -> Result<Self> {
        let selection = Selection::initial(&catalog)?;
        let primary = primary_index(&indexes, selection.primary_field())?;
        Ok(Self {
            dataset,
            catalog,
            indexes,
            max_rows: DEFAULT_MAX_ROWS,
            selection,
            primary,
            secondary: None,
            detail: None,
        })
    }

    #[must_use]
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Applies one event and re-derives the affected outputs.
    ///
    /// # Errors
    ///
    /// Propagates [`ViewError::UnknownField`] and [`ViewError::InvalidSelection`]
    /// from the reducer; the view is unchanged in that case.
    pub fn apply(&mut self, event: &ViewEvent) -> Result<()> {
        let next = self.selection.reduce(&self.catalog, &self.indexes, event)?;
        match event {
            ViewEvent::PrimaryChanged(_) => {
                let primary = primary_index(&self.indexes, next.primary_field())?;
                self.primary = primary;
                self.secondary = None;
                self.detail = None;
            }
            ViewEvent::SecondaryChanged(_) | ViewEvent::PrimaryHovered(_) => {
                self.secondary = self.derive_secondary(&next)?;
            }
            ViewEvent::PrimaryClicked(_) => {
                self.detail = self.derive_detail(&next)?;
            }
        }
        debug!(
            ?event,
            primary = next.primary_field(),
            secondary = next.secondary_field(),
            hover = next.active_primary_value(),
            click = next.active_click_value(),
            "cross-filter transition"
        );
        self.selection = next;
        Ok(())
    }

    pub fn change_primary(&mut self, field: &str) -> Result<()> {
        self.apply(&ViewEvent::PrimaryChanged(field.to_string()))
    }

    pub fn change_secondary(&mut self, field: &str) -> Result<()> {
        self.apply(&ViewEvent::SecondaryChanged(field.to_string()))
    }

    pub fn hover(&mut self, value: Option<&str>) -> Result<()> {
        self.apply(&ViewEvent::PrimaryHovered(value.map(str::to_string)))
    }

    pub fn click(&mut self, value: Option<&str>) -> Result<()> {
        self.apply(&ViewEvent::PrimaryClicked(value.map(str::to_string)))
    }

    fn derive_secondary(&self, selection: &Selection) -> Result<Option<CategoryIndex>> {
        let Some(value) = selection.active_primary_value() else {
            return Ok(None);
        };
        let rows = filter_equals(&self.dataset, selection.primary_field(), value)?;
        compute_index_over(&self.dataset, selection.secondary_field(), rows).map(Some)
    }

    fn derive_detail(&self, selection: &Selection) -> Result<Option<DetailRows>> {
        let Some(value) = selection.active_click_value() else {
            return Ok(None);
        };
        let mut rows = matching_rows(&self.dataset, selection.primary_field(), value)?;
        let matched = rows.len();
        rows.truncate(self.max_rows);
        Ok(Some(DetailRows { rows, matched }))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn primary_aggregate(&self) -> &CategoryIndex {
        &self.primary
    }

    /// `None` while no primary value is hovered.
    pub fn secondary_aggregate(&self) -> Option<&CategoryIndex> {
        self.secondary.as_ref()
    }

    /// Records of the clicked primary value, at most `max_rows`, in dataset order.
    pub fn detail_rows(&self) -> Vec<&StudyRecord> {
        self.detail
            .iter()
            .flat_map(|detail| detail.rows.iter())
            .filter_map(|&row| self.dataset.get(row))
            .collect()
    }

    /// Number of records matching the clicked value before truncation.
    pub fn detail_match_count(&self) -> Option<usize> {
        self.detail.as_ref().map(|detail| detail.matched)
    }

    /// Secondary field choices: every catalog field except the primary one.
    pub fn secondary_options(&self) -> Vec<&FieldLabel> {
        self.catalog.without(self.selection.primary_field())
    }

    fn label<'a>(&'a self, field: &'a str) -> &'a str {
        self.catalog.label_or_field(field)
    }

    /// Heading of the primary aggregate, synced to the primary field.
    pub fn title(&self) -> String {
        format!(
            "{} {PRIMARY_TITLE_HINT}",
            self.label(self.selection.primary_field())
        )
    }

    pub fn secondary_title(&self) -> Option<String> {
        let value = self.secondary.as_ref().and(self.selection.active_primary_value())?;
        Some(format!(
            "{} options when {} = {value}",
            self.label(self.selection.secondary_field()),
            self.label(self.selection.primary_field()),
        ))
    }

    pub fn detail_heading(&self) -> Option<String> {
        let value = self.detail.as_ref().and(self.selection.active_click_value())?;
        Some(format!(
            "Showing studies where {} = {value}",
            self.label(self.selection.primary_field()),
        ))
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            selection: self.selection.clone(),
            title: self.title(),
            primary: self.primary.clone(),
            secondary_title: self.secondary_title(),
            secondary: self.secondary.clone(),
            detail_heading: self.detail_heading(),
            detail_rows: self.detail_rows().into_iter().cloned().collect(),
            detail_matches: self.detail_match_count(),
        }
    }
}

fn primary_index(indexes: &IndexCache, field: &str) -> Result<CategoryIndex> {
    indexes
        .get(field)
        .cloned()
        .ok_or_else(|| ViewError::unknown_field(field))
}
