//! Derived views over the study dataset.
//!
//! - [`index`]: group-and-count per field, plus a shared cache.
//! - [`search`]: case-insensitive substring search across all columns.
//! - [`selection`] and [`view`]: the linked cross-filter state machine.
//! - [`explorer`]: the read-only context shared by sessions.

pub mod explorer;
pub mod filter;
pub mod index;
pub mod links;
pub mod search;
pub mod selection;
pub mod view;

pub use explorer::Explorer;
pub use filter::{filter_equals, matching_rows};
pub use index::{IndexCache, compute_index, compute_index_over};
pub use links::{doi_markdown, doi_url};
pub use search::search;
pub use selection::{Selection, ViewEvent};
pub use view::{CrossFilterView, DEFAULT_MAX_ROWS, ViewSnapshot};
