use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use rtfmri_core::{CrossFilterView, doi_markdown, doi_url};
use rtfmri_model::{CategoryIndex, DOI_FIELD, Dataset, FieldCatalog, StudyRecord};

use crate::types::{FieldsReport, SubmissionResult};

const BAR_WIDTH: usize = 30;

#[derive(Clone, Copy)]
enum DoiStyle {
    Markdown,
    Url,
}

pub fn print_fields(report: &FieldsReport) {
    println!("Dataset: {}", report.dataset.display());
    println!("Studies: {}", report.studies);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Values"),
        header_cell("Most common"),
        header_cell("Count"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for summary in &report.fields {
        table.add_row(vec![
            Cell::new(&summary.field)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&summary.label),
            Cell::new(summary.distinct),
            summary
                .top_value
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(summary.top_count),
        ]);
    }
    println!("{table}");
    if !report.dropped.is_empty() {
        eprintln!("Dropped columns (at least one study has no value):");
        for column in &report.dropped {
            eprintln!("- {} ({} missing)", column.name, column.missing);
        }
    }
}

pub fn print_browse(records: &[&StudyRecord], matched: usize, catalog: &FieldCatalog, dataset: &Dataset) {
    let table = record_table(records, catalog, dataset, DoiStyle::Markdown);
    println!("{table}");
    println!("Showing {} of {matched} matching studies", records.len());
}

pub fn print_view(view: &CrossFilterView, columns: &FieldCatalog) {
    println!("{}", view.title());
    println!("{}", aggregate_table(view.primary_aggregate()));

    if let (Some(title), Some(secondary)) = (view.secondary_title(), view.secondary_aggregate()) {
        println!();
        println!("{title}");
        println!("{}", aggregate_table(secondary));
    }

    if let Some(heading) = view.detail_heading() {
        let rows = view.detail_rows();
        println!();
        println!("{heading}");
        println!("{}", record_table(&rows, columns, view.dataset(), DoiStyle::Url));
        if let Some(matched) = view.detail_match_count()
            && matched > rows.len()
        {
            println!("First {} of {matched} studies", rows.len());
        }
    }
}

pub fn print_submission(result: &SubmissionResult) {
    match (&result.output, &result.data_uri) {
        (Some(path), _) => println!("Wrote {}", path.display()),
        (None, Some(uri)) => println!("{uri}"),
        (None, None) => print!("{}", result.csv),
    }
    if !result.sentences.is_empty() {
        println!();
        for sentence in &result.sentences {
            println!("{sentence}");
        }
    }
}

fn aggregate_table(index: &CategoryIndex) -> Table {
    let max = index.iter().map(|entry| entry.count).max().unwrap_or(0);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(index.field()),
        header_cell("Studies"),
        header_cell(""),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in index {
        table.add_row(vec![
            Cell::new(&entry.value),
            Cell::new(entry.count),
            Cell::new(bar(entry.count, max)).fg(Color::Cyan),
        ]);
    }
    table.add_row(vec![
        dim_cell("total"),
        Cell::new(index.total()).add_attribute(Attribute::Bold),
        dim_cell(""),
    ]);
    table
}

fn record_table(records: &[&StudyRecord], catalog: &FieldCatalog, dataset: &Dataset, doi: DoiStyle) -> Table {
    let columns = display_columns(catalog, dataset);
    let mut table = Table::new();
    table.set_header(columns.iter().map(|(_, label)| header_cell(label)));
    apply_wide_table_style(&mut table);
    for record in records {
        table.add_row(columns.iter().map(|(field, _)| {
            let value = record.get(field).unwrap_or_default();
            if field == DOI_FIELD && !value.is_empty() {
                let link = match doi {
                    DoiStyle::Markdown => doi_markdown(value),
                    DoiStyle::Url => doi_url(value),
                };
                Cell::new(link).fg(Color::Blue)
            } else {
                Cell::new(value)
            }
        }));
    }
    table
}

/// Catalog columns the dataset still has, then any uncatalogued columns.
fn display_columns(catalog: &FieldCatalog, dataset: &Dataset) -> Vec<(String, String)> {
    let mut columns: Vec<(String, String)> = catalog
        .entries()
        .iter()
        .filter(|entry| dataset.has_field(&entry.field))
        .map(|entry| (entry.field.clone(), entry.label.clone()))
        .collect();
    for column in dataset.columns() {
        if !catalog.contains(column) {
            columns.push((column.clone(), column.clone()));
        }
    }
    columns
}

fn bar(count: usize, max: usize) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH).div_ceil(max);
    "█".repeat(width)
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(200);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
