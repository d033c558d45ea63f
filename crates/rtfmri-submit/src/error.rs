//! Error type for the submission form and its export.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SubmitError {
    // =========================================================================
    // FORM ERRORS
    // =========================================================================
    /// Field is not part of the submission form.
    #[error("unknown field: {field}")]
    UnknownField { field: String },

    /// Value is not one of the options the dataset offers for the field.
    #[error("'{value}' is not an option for {field}")]
    InvalidOption { field: String, value: String },

    /// A single-choice field was given a second, different value.
    #[error("{field} takes a single value; already set to '{existing}'")]
    MultipleValues { field: String, existing: String },

    // =========================================================================
    // EXPORT ERRORS
    // =========================================================================
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write the export file.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SubmitError>;

impl SubmitError {
    pub(crate) fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField {
            field: field.into(),
        }
    }

    /// Whether the user can fix the input and submit again.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownField { .. } | Self::InvalidOption { .. } | Self::MultipleValues { .. }
        )
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::UnknownField { .. } => Some("Run `rtfmri fields` to list the form fields."),
            Self::InvalidOption { .. } => {
                Some("Pick one of the values already coded in the dataset.")
            }
            Self::MultipleValues { .. } => {
                Some("Only the respiratory noise removal checklist accepts several values.")
            }
            Self::WriteFile { .. } => Some("Check that the output directory exists and is writable."),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_errors_are_recoverable() {
        let err = SubmitError::InvalidOption {
            field: "vendor".into(),
            value: "Bruker".into(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "'Bruker' is not an option for vendor");
        assert!(err.suggestion().is_some());

        let io = SubmitError::Io(std::io::Error::other("disk full"));
        assert!(!io.is_recoverable());
        assert_eq!(io.suggestion(), None);
    }
}
