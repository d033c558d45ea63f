//! Methods-section sentences generated from a submission.

use rtfmri_core::doi_url;
use rtfmri_model::FieldCatalog;

use crate::form::SubmissionForm;

/// Fields reported under "Hardware and software"; the rest are processing steps.
pub const HARDWARE_FIELDS: &[&str] = &["vendor", "magnet", "software"];

/// One sentence per answered group: study details, acquisition, real-time
/// software and processing steps. Unanswered groups produce nothing.
pub fn methods_sentences(form: &SubmissionForm, catalog: &FieldCatalog) -> Vec<String> {
    let mut sentences = Vec::new();
    if let Some(sentence) = study_sentence(form) {
        sentences.push(sentence);
    }

    let scanner: Vec<String> = ["vendor", "magnet"]
        .into_iter()
        .filter(|field| catalog.contains(field))
        .map(|field| form.values(field).join(" and "))
        .filter(|value| !value.is_empty())
        .collect();
    if !scanner.is_empty() {
        sentences.push(format!("Data were acquired on a {} MRI scanner.", scanner.join(" ")));
    }

    let software = form.values("software");
    if catalog.contains("software") && !software.is_empty() {
        sentences.push(format!(
            "Real-time processing was performed with {}.",
            software.join(" and ")
        ));
    }

    let steps: Vec<String> = catalog
        .entries()
        .iter()
        .filter(|entry| !HARDWARE_FIELDS.contains(&entry.field.as_str()))
        .filter_map(|entry| {
            let values = form.values(&entry.field);
            (!values.is_empty()).then(|| format!("{}: {}", entry.label, values.join(", ")))
        })
        .collect();
    if !steps.is_empty() {
        sentences.push(format!(
            "The following real-time processing steps were reported: {}.",
            steps.join("; ")
        ));
    }
    sentences
}

fn study_sentence(form: &SubmissionForm) -> Option<String> {
    let non_blank = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let title = non_blank(&form.article_title);
    let author = non_blank(&form.author);
    let doi = non_blank(&form.doi);

    let mut sentence = match (title, author) {
        (Some(title), Some(author)) => format!("These methods were reported in \"{title}\" by {author}"),
        (Some(title), None) => format!("These methods were reported in \"{title}\""),
        (None, Some(author)) => format!("These methods were reported by {author}"),
        (None, None) if doi.is_some() => "These methods were reported".to_string(),
        (None, None) => return None,
    };
    if let Some(doi) = doi {
        sentence.push_str(&format!(" ({})", doi_url(&doi)));
    }
    sentence.push('.');
    Some(sentence)
}
