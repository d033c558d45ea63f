use thiserror::Error;

/// Errors raised while selecting fields or deriving views.
///
/// Both variants signal a programming or configuration mistake: the intended
/// affordances only ever offer catalog fields, and the secondary selector only
/// offers the complement of the primary field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("unknown field: {field}")]
    UnknownField { field: String },

    #[error("invalid selection: secondary field '{field}' is already the primary field")]
    InvalidSelection { field: String },

    /// Two distinct fields are needed to link a primary and a secondary view.
    #[error("catalog has {fields} field(s); at least two are required")]
    CatalogTooSmall { fields: usize },
}

impl ViewError {
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }
}

/// Errors raised while assembling a [`Dataset`](crate::Dataset) from raw rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("duplicate column '{column}'")]
    DuplicateColumn { column: String },

    #[error("row {row} has {found} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, ViewError>;
