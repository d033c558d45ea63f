use std::fs;
use std::io::Write;

use rtfmri_ingest::{IngestError, load_dataset};

#[test]
fn loads_carriage_return_file_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    write!(
        file,
        "author\tvendor\tmagnet\tsoftware\tdoi\r\
         Doe et al. (2018)\tSiemens\t3T\tTBV\t10.1016/a\r\
         Roe et al. (2019)\tPhilips\t3T\t\t10.1016/b\r\
         Poe et al. (2020)\tGE\t1.5T\tAFNI\t10.1016/c\r"
    )
    .expect("write dataset");

    let loaded = load_dataset(file.path()).expect("load dataset");

    assert_eq!(loaded.dataset.len(), 3);
    assert_eq!(loaded.dataset.columns(), ["author", "vendor", "magnet", "doi"]);
    assert_eq!(loaded.dropped.len(), 1);
    assert_eq!(loaded.dropped[0].name, "software");
    let authors: Vec<&str> = loaded
        .dataset
        .iter()
        .filter_map(|record| record.author())
        .collect();
    assert_eq!(
        authors,
        vec!["Doe et al. (2018)", "Roe et al. (2019)", "Poe et al. (2020)"]
    );
    assert_eq!(loaded.source, file.path());
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("absent.txt");
    let err = load_dataset(&path).unwrap_err();
    assert!(matches!(err, IngestError::FileRead { .. }));
    assert!(err.to_string().contains("absent.txt"));
}

#[test]
fn empty_file_has_no_header() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").expect("write empty file");
    let err = load_dataset(&path).unwrap_err();
    assert!(matches!(err, IngestError::MissingHeader { .. }));
}

#[test]
fn crlf_and_lf_terminators_load_identically() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let crlf = dir.path().join("crlf.txt");
    let lf = dir.path().join("lf.txt");
    fs::write(&crlf, "vendor\tmagnet\r\nSiemens\t3T\r\nGE\t1.5T\r\n").expect("write crlf");
    fs::write(&lf, "vendor\tmagnet\nSiemens\t3T\nGE\t1.5T\n").expect("write lf");

    let left = load_dataset(&crlf).expect("load crlf");
    let right = load_dataset(&lf).expect("load lf");
    assert_eq!(left.dataset, right.dataset);
}

#[test]
fn cells_are_trimmed_and_na_tokens_are_values() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("padded.txt");
    fs::write(
        &path,
        "vendor\tmagnet\tresp\tnotes\n \
         Siemens\t3T\tNA\tkept\n\
         Siemens \t3T\tNone\t \n\
         GE\tnull\tn/a\tkept\n",
    )
    .expect("write dataset");

    let loaded = load_dataset(&path).expect("load dataset");

    assert_eq!(loaded.dataset.columns(), ["vendor", "magnet", "resp"]);
    assert_eq!(loaded.dropped.len(), 1);
    assert_eq!(loaded.dropped[0].name, "notes");
    let vendors: Vec<&str> = loaded
        .dataset
        .iter()
        .filter_map(|record| record.get("vendor"))
        .collect();
    assert_eq!(vendors, vec!["Siemens", "Siemens", "GE"]);
    let resp: Vec<&str> = loaded
        .dataset
        .iter()
        .filter_map(|record| record.get("resp"))
        .collect();
    assert_eq!(resp, vec!["NA", "None", "n/a"]);
    assert_eq!(loaded.dataset.records()[2].get("magnet"), Some("null"));
}
