//! One-row CSV export of a submission, as text, a file or a `data:` URI.

use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use rtfmri_model::FieldCatalog;

use crate::error::{Result, SubmitError};
use crate::form::SubmissionForm;

pub const DATA_URI_PREFIX: &str = "data:text/csv;charset=utf-8,";

/// Joins the ticked values of a checklist field inside one cell.
pub const CHECKLIST_SEPARATOR: &str = ";";

/// Writes the header of catalog field identifiers and the single answer row.
///
/// Unanswered fields are empty cells. Study details are not exported.
pub fn write_csv<W: Write>(form: &SubmissionForm, catalog: &FieldCatalog, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(catalog.fields())?;
    csv.write_record(
        catalog
            .fields()
            .map(|field| form.values(field).join(CHECKLIST_SEPARATOR)),
    )?;
    csv.flush()?;
    Ok(())
}

pub fn export_csv(form: &SubmissionForm, catalog: &FieldCatalog) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(form, catalog, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn export_data_uri(form: &SubmissionForm, catalog: &FieldCatalog) -> Result<String> {
    let csv = export_csv(form, catalog)?;
    Ok(format!("{DATA_URI_PREFIX}{}", percent_encode(&csv)))
}

/// Writes the CSV export to `path`, replacing any existing file.
pub fn write_export(form: &SubmissionForm, catalog: &FieldCatalog, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|source| SubmitError::WriteFile {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(form, catalog, file)?;
    info!(path = %path.display(), fields = catalog.len(), "submission exported");
    Ok(())
}

/// Percent-encodes every UTF-8 byte outside `A-Z a-z 0-9 _ . - ~ /`.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'.' | b'-' | b'~' | b'/') {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "%{byte:02X}");
        }
    }
    out
}
