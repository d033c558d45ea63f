//! Tests for rtfmri-model types.

use rtfmri_model::{CategoryIndex, Dataset, FieldCatalog, ViewError};

fn sample_dataset() -> Dataset {
    Dataset::new(
        vec!["author".to_string(), "vendor".to_string(), "doi".to_string()],
        vec![
            vec!["Doe et al. (2018)".into(), "Siemens".into(), "10.1/x".into()],
            vec!["Smith et al. (2019)".into(), "Philips".into(), "10.1/y".into()],
        ],
    )
    .expect("build dataset")
}

#[test]
fn record_serializes_as_ordered_map() {
    let dataset = sample_dataset();
    let json = serde_json::to_string(dataset.get(0).unwrap()).expect("serialize record");
    assert_eq!(
        json,
        r#"{"author":"Doe et al. (2018)","vendor":"Siemens","doi":"10.1/x"}"#
    );
}

#[test]
fn index_serializes_entries_in_order() {
    let index = CategoryIndex::from_first_seen(
        "vendor",
        vec![("GE".to_string(), 1), ("Siemens".to_string(), 3)],
    );
    let value = serde_json::to_value(&index).expect("serialize index");
    assert_eq!(value["field"], "vendor");
    assert_eq!(value["entries"][0]["value"], "Siemens");
    assert_eq!(value["entries"][0]["count"], 3);
    assert_eq!(value["entries"][1]["value"], "GE");
}

#[test]
fn catalog_round_trips_through_json() {
    let catalog = FieldCatalog::new([("vendor", "Vendor"), ("magnet", "Field strength")]);
    let json = serde_json::to_string(&catalog).expect("serialize catalog");
    let round: FieldCatalog = serde_json::from_str(&json).expect("deserialize catalog");
    assert_eq!(round, catalog);
}

#[test]
fn column_catalog_labels_every_table_column() {
    let dataset = sample_dataset();
    let catalog = FieldCatalog::columns();
    for column in dataset.columns() {
        assert!(catalog.label(column).is_some(), "missing label for {column}");
    }
}

#[test]
fn view_error_messages() {
    assert_eq!(
        ViewError::unknown_field("scanner").to_string(),
        "unknown field: scanner"
    );
    assert_eq!(
        ViewError::InvalidSelection {
            field: "vendor".to_string()
        }
        .to_string(),
        "invalid selection: secondary field 'vendor' is already the primary field"
    );
}
