//! Data model for the rtfMRI methods explorer.
//!
//! The dataset is a small, immutable table of coded neurofeedback studies.
//! Everything else in the workspace derives read-only views from it.

pub mod catalog;
pub mod error;
pub mod index;
pub mod record;

pub use catalog::{COLUMN_FIELDS, FieldCatalog, FieldLabel, PLOT_FIELDS};
pub use error::{DatasetError, Result, ViewError};
pub use index::{CategoryCount, CategoryIndex};
pub use record::{AUTHOR_FIELD, DOI_FIELD, Dataset, StudyRecord};
