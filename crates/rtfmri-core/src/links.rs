//! DOI link rendering.

pub const DOI_RESOLVER: &str = "https://doi.org/";

pub fn doi_url(doi: &str) -> String {
    format!("{DOI_RESOLVER}{doi}")
}

/// Markdown link whose text is the bare DOI.
pub fn doi_markdown(doi: &str) -> String {
    format!("[{doi}]({})", doi_url(doi))
}
