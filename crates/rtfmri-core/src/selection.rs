//! Selection state of the cross-filter view and its pure reducer.
//!
//! | Event              | Primary aggregate | Secondary aggregate           | Detail table  |
//! |--------------------|-------------------|-------------------------------|---------------|
//! | `PrimaryChanged`   | recompute         | suppressed until next hover   | cleared       |
//! | `SecondaryChanged` | unchanged         | recompute iff a hover is set  | unchanged     |
//! | `PrimaryHovered`   | unchanged         | recompute, or suppressed      | unchanged     |
//! | `PrimaryClicked`   | unchanged         | unchanged                     | recompute     |

use serde::{Deserialize, Serialize};
use tracing::warn;

use rtfmri_model::{FieldCatalog, Result, ViewError};

use crate::index::IndexCache;

/// User interactions with the linked aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum ViewEvent {
    /// A new field was picked for the primary aggregate.
    PrimaryChanged(String),
    /// A new field was picked for the secondary aggregate.
    SecondaryChanged(String),
    /// A primary bar gained (`Some`) or lost (`None`) hover focus.
    PrimaryHovered(Option<String>),
    /// A primary bar was clicked; `None` clears the drill-down.
    PrimaryClicked(Option<String>),
}

/// Which fields are linked and which primary values are active.
///
/// Invariant: `primary_field != secondary_field`, both catalog members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    primary_field: String,
    secondary_field: String,
    active_primary_value: Option<String>,
    active_click_value: Option<String>,
}

impl Selection {
    /// Initial state: the first catalog field against the next one.
    ///
    /// # Errors
    ///
    /// [`ViewError::CatalogTooSmall`] when the catalog has fewer than two fields.
    pub fn initial(catalog: &FieldCatalog) -> Result<Self> {
        let too_small = || ViewError::CatalogTooSmall {
            fields: catalog.len(),
        };
        let primary = catalog.first().ok_or_else(too_small)?;
        let secondary = catalog.first_other_than(primary).ok_or_else(too_small)?;
        Ok(Self {
            primary_field: primary.to_string(),
            secondary_field: secondary.to_string(),
            active_primary_value: None,
            active_click_value: None,
        })
    }

    pub fn primary_field(&self) -> &str {
        &self.primary_field
    }

    pub fn secondary_field(&self) -> &str {
        &self.secondary_field
    }

    /// The primary value currently hovered.
    pub fn active_primary_value(&self) -> Option<&str> {
        self.active_primary_value.as_deref()
    }

    /// The primary value most recently clicked.
    pub fn active_click_value(&self) -> Option<&str> {
        self.active_click_value.as_deref()
    }

    /// Computes the state after `event` without touching `self`.
    ///
    /// Hover and click values that do not occur in the current primary
    /// aggregate are stale; they clear the corresponding value instead of
    /// failing.
    ///
    /// # Errors
    ///
    /// - [`ViewError::UnknownField`] for a field outside the catalog.
    /// - [`ViewError::InvalidSelection`] when the secondary field would equal
    ///   the primary field.
    pub fn reduce(
        &self,
        catalog: &FieldCatalog,
        indexes: &IndexCache,
        event: &ViewEvent,
    ) -> Result<Self> {
        let mut next = self.clone();
        match event {
            ViewEvent::PrimaryChanged(field) => {
                if !catalog.contains(field) {
                    return Err(ViewError::unknown_field(field.as_str()));
                }
                if self.secondary_field == *field {
                    next.secondary_field = catalog
                        .first_other_than(field)
                        .ok_or(ViewError::CatalogTooSmall {
                            fields: catalog.len(),
                        })?
                        .to_string();
                }
                next.primary_field.clone_from(field);
                next.active_primary_value = None;
                next.active_click_value = None;
            }
            ViewEvent::SecondaryChanged(field) => {
                if !catalog.contains(field) {
                    return Err(ViewError::unknown_field(field.as_str()));
                }
                if self.primary_field == *field {
                    return Err(ViewError::InvalidSelection {
                        field: field.clone(),
                    });
                }
                next.secondary_field.clone_from(field);
            }
            ViewEvent::PrimaryHovered(value) => {
                next.active_primary_value = self.live_value(indexes, value.as_deref(), "hover")?;
            }
            ViewEvent::PrimaryClicked(value) => {
                next.active_click_value = self.live_value(indexes, value.as_deref(), "click")?;
            }
        }
        Ok(next)
    }

    fn live_value(
        &self,
        indexes: &IndexCache,
        value: Option<&str>,
        kind: &str,
    ) -> Result<Option<String>> {
        let Some(value) = value else {
            return Ok(None);
        };
        let primary = indexes
            .get(&self.primary_field)
            .ok_or_else(|| ViewError::unknown_field(self.primary_field.as_str()))?;
        if primary.contains(value) {
            Ok(Some(value.to_string()))
        } else {
            warn!(
                field = %self.primary_field,
                value,
                kind,
                "ignoring stale event for a value not in the primary aggregate"
            );
            Ok(None)
        }
    }
}
