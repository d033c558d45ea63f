//! The methods submission form and the options it offers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use rtfmri_core::compute_index;
use rtfmri_model::{Dataset, FieldCatalog};

use crate::error::{Result, SubmitError};

/// Fields answered with a checklist rather than a single choice.
pub const CHECKLIST_FIELDS: &[&str] = &["resp"];

pub fn is_checklist(field: &str) -> bool {
    CHECKLIST_FIELDS.contains(&field)
}

/// Distinct values of `field`, most frequent first.
///
/// # Errors
///
/// [`SubmitError::UnknownField`] when the dataset has no such column.
pub fn form_options(dataset: &Dataset, field: &str) -> Result<Vec<String>> {
    let index = compute_index(dataset, field).map_err(|_| SubmitError::unknown_field(field))?;
    Ok(index.values().map(str::to_string).collect())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOptions {
    pub field: String,
    pub label: String,
    /// Several values may be ticked.
    pub multiple: bool,
    pub values: Vec<String>,
}

/// Per-field choices offered by the form, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormOptions {
    fields: Vec<FieldOptions>,
}

impl FormOptions {
    /// Derives options for every catalog field the dataset still carries.
    pub fn from_dataset(dataset: &Dataset, catalog: &FieldCatalog) -> Result<Self> {
        let mut fields = Vec::with_capacity(catalog.len());
        for entry in catalog.entries() {
            if !dataset.has_field(&entry.field) {
                debug!(field = %entry.field, "no options for a column absent from the dataset");
                continue;
            }
            fields.push(FieldOptions {
                field: entry.field.clone(),
                label: entry.label.clone(),
                multiple: is_checklist(&entry.field),
                values: form_options(dataset, &entry.field)?,
            });
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldOptions] {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&FieldOptions> {
        self.fields.iter().find(|options| options.field == field)
    }

    pub fn is_offered(&self, field: &str, value: &str) -> bool {
        self.get(field)
            .is_some_and(|options| options.values.iter().any(|v| v == value))
    }
}

/// A study's self-reported methods.
///
/// Study details are free text. Every other answer is keyed by catalog field
/// and only checklist fields hold more than one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionForm {
    pub author: Option<String>,
    pub doi: Option<String>,
    pub article_title: Option<String>,
    pub(crate) selections: BTreeMap<String, Vec<String>>,
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an answer. Checklist fields accumulate distinct values; a
    /// single-choice field accepts a repeat of its current value only.
    ///
    /// # Errors
    ///
    /// [`SubmitError::MultipleValues`] when a single-choice field already
    /// holds a different value.
    pub fn select(&mut self, field: &str, value: &str) -> Result<()> {
        let values = self.selections.entry(field.to_string()).or_default();
        if values.iter().any(|v| v == value) {
            return Ok(());
        }
        if !is_checklist(field)
            && let Some(existing) = values.first()
        {
            return Err(SubmitError::MultipleValues {
                field: field.to_string(),
                existing: existing.clone(),
            });
        }
        values.push(value.to_string());
        Ok(())
    }

    pub fn clear(&mut self, field: &str) {
        self.selections.remove(field);
    }

    /// Selected values of `field`; empty when unanswered.
    pub fn values(&self, field: &str) -> &[String] {
        self.selections.get(field).map_or(&[], Vec::as_slice)
    }

    pub fn selections(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.selections
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| (field.as_str(), values.as_slice()))
    }

    /// Checks every answer against the offered options.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::UnknownField`] for a field the form does not offer.
    /// - [`SubmitError::InvalidOption`] for a value outside the field's options.
    /// - [`SubmitError::MultipleValues`] for a single-choice field holding
    ///   several values.
    pub fn validate(&self, options: &FormOptions) -> Result<()> {
        for (field, values) in self.selections() {
            let offered = options
                .get(field)
                .ok_or_else(|| SubmitError::unknown_field(field))?;
            if !offered.multiple && values.len() > 1 {
                return Err(SubmitError::MultipleValues {
                    field: field.to_string(),
                    existing: values[0].clone(),
                });
            }
            if let Some(value) = values.iter().find(|v| !offered.values.contains(v)) {
                return Err(SubmitError::InvalidOption {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::new(
            vec!["vendor".into(), "magnet".into(), "resp".into()],
            vec![
                vec!["GE".into(), "3T".into(), "RETROICOR".into()],
                vec!["Siemens".into(), "3T".into(), "None".into()],
                vec!["Siemens".into(), "1.5T".into(), "None".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn options_follow_index_order() {
        assert_eq!(form_options(&dataset(), "vendor").unwrap(), vec!["Siemens", "GE"]);
        assert!(matches!(
            form_options(&dataset(), "software"),
            Err(SubmitError::UnknownField { .. })
        ));
    }

    #[test]
    fn options_skip_dropped_columns() {
        let options = FormOptions::from_dataset(&dataset(), &FieldCatalog::plot()).unwrap();
        let fields: Vec<&str> = options.fields().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["vendor", "magnet", "resp"]);
        assert!(options.get("resp").unwrap().multiple);
        assert!(!options.get("vendor").unwrap().multiple);
        assert!(options.is_offered("magnet", "1.5T"));
        assert!(!options.is_offered("magnet", "7T"));
    }

    #[test]
    fn single_choice_rejects_second_value() {
        let mut form = SubmissionForm::new();
        form.select("vendor", "GE").unwrap();
        form.select("vendor", "GE").unwrap();
        assert!(matches!(
            form.select("vendor", "Siemens"),
            Err(SubmitError::MultipleValues { .. })
        ));
        assert_eq!(form.values("vendor"), ["GE".to_string()]);

        form.select("resp", "RETROICOR").unwrap();
        form.select("resp", "None").unwrap();
        assert_eq!(form.values("resp").len(), 2);
    }

    #[test]
    fn validate_checks_fields_and_values() {
        let options = FormOptions::from_dataset(&dataset(), &FieldCatalog::plot()).unwrap();
        let mut form = SubmissionForm::new();
        form.select("vendor", "Siemens").unwrap();
        form.select("resp", "RETROICOR").unwrap();
        form.select("resp", "None").unwrap();
        assert!(form.validate(&options).is_ok());

        form.select("magnet", "7T").unwrap();
        assert!(matches!(
            form.validate(&options),
            Err(SubmitError::InvalidOption { ref field, ref value }) if field == "magnet" && value == "7T"
        ));

        form.clear("magnet");
        form.select("software", "TBV").unwrap();
        assert!(matches!(
            form.validate(&options),
            Err(SubmitError::UnknownField { ref field }) if field == "software"
        ));
    }

    #[test]
    fn deserialized_forms_are_still_validated() {
        let options = FormOptions::from_dataset(&dataset(), &FieldCatalog::plot()).unwrap();
        let form: SubmissionForm = serde_json::from_str(
            r#"{"author":null,"doi":null,"article_title":null,
                "selections":{"vendor":["GE","Siemens"]}}"#,
        )
        .unwrap();
        assert!(matches!(
            form.validate(&options),
            Err(SubmitError::MultipleValues { .. })
        ));
    }
}
