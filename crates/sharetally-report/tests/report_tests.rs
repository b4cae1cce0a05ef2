use sharetally_report::{JsonReport, build_rows, render_table, write_csv_file};
use sharetally_scan::{Classifier, IngestDriver, KeyResolver, RawLine, ScanRoot};

fn outcome() -> sharetally_scan::RollupOutcome {
    let mut driver = IngestDriver::with_parts(Classifier::default(), KeyResolver::new(1));
    driver.ingest_all(
        [
            r"d S-1-5-21 4.0KiB 2d path\sub1",
            r"f S-1-5-21-500 65.1KiB 59d4h path\sub1\file.txt",
            r"f S-1-5-21-900 729 +0s path\sub2\notes.txt",
        ]
        .map(|l| RawLine::Output(l.to_string())),
    );
    driver.finish(Some(0)).unwrap()
}

#[test]
fn test_rows_follow_key_order() {
    let root = ScanRoot::parse(r"\\fs01\projects\path").unwrap();
    let rows = build_rows(&root, &outcome().folders);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].path, r"\\fs01\projects\path\sub1");
    assert_eq!(rows[0].size_bytes, 70_758);
    assert_eq!(rows[0].newest_age, "2d");
    assert_eq!(rows[1].path, r"\\fs01\projects\path\sub2");
    assert_eq!(rows[1].size, "729 B");
    assert_eq!(rows[1].newest_age, "0s");
}

#[test]
fn test_csv_file_roundtrip() {
    let root = ScanRoot::parse(r"\\fs01\projects\path").unwrap();
    let rows = build_rows(&root, &outcome().folders);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.csv");
    write_csv_file(&path, &rows).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 3);
    assert!(text.contains(r"S-1-5-21-900,\\fs01\projects\path\sub2,729 B,729,0s,0"));
}

#[test]
fn test_csv_file_bad_directory() {
    let err = write_csv_file(std::path::Path::new("/no/such/dir/report.csv"), &[]).unwrap_err();
    assert!(matches!(err, sharetally_report::ReportError::Io { .. }));
}

#[test]
fn test_json_report() {
    let root = ScanRoot::parse(r"\\fs01\projects\path").unwrap();
    let outcome = outcome();
    let rows = build_rows(&root, &outcome.folders);

    let json = JsonReport::new(&root, &outcome, &rows).to_string_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["root"], r"\\fs01\projects\path");
    assert_eq!(value["partial"], false);
    assert_eq!(value["stats"]["processed"], 3);
    assert_eq!(value["folders"][0]["SizeBytes"], 70_758);
}

#[test]
fn test_table_lists_every_folder() {
    let root = ScanRoot::parse(r"\\fs01\projects\path").unwrap();
    let table = render_table(&build_rows(&root, &outcome().folders));
    assert!(table.contains(r"\\fs01\projects\path\sub1"));
    assert!(table.contains(r"\\fs01\projects\path\sub2"));
}
