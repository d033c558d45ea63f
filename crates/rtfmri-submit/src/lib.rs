//! Methods submission: a form constrained by the values already coded in the
//! dataset, exported as a one-row CSV and as methods-section sentences.

pub mod error;
pub mod export;
pub mod form;
pub mod sentences;

pub use error::{Result, SubmitError};
pub use export::{
    CHECKLIST_SEPARATOR, DATA_URI_PREFIX, export_csv, export_data_uri, percent_encode, write_csv,
    write_export,
};
pub use form::{
    CHECKLIST_FIELDS, FieldOptions, FormOptions, SubmissionForm, form_options, is_checklist,
};
pub use sentences::{HARDWARE_FIELDS, methods_sentences};
