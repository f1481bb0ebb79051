mod common;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use kira_biodiversity::config::TableNames;
use kira_biodiversity::error::KiraError;
use kira_biodiversity::store::Store;

use common::{BASE_SCHEMA, Fixture};

#[test]
fn missing_database_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.sqlite")).unwrap();
    let err = Store::open(&path, &TableNames::default()).unwrap_err();
    assert_matches!(err, KiraError::Schema(_));
}

#[test]
fn missing_abundance_table_is_schema_error() {
    let fixture = Fixture::new(BASE_SCHEMA);
    let err = Store::open(&fixture.path, &TableNames::default()).unwrap_err();
    assert_matches!(err, KiraError::Schema(message) if message.contains("samples"));
}

#[test]
fn missing_metadata_column_is_schema_error() {
    let fixture = Fixture::new(
        "CREATE TABLE otu (otu_id INTEGER, lowest_taxonomic_unit_found TEXT);
         CREATE TABLE samples_metadata (SAMPLEID INTEGER, AGE INTEGER);
         CREATE TABLE samples (otu_id INTEGER, BB_940 INTEGER);",
    );
    let err = Store::open(&fixture.path, &TableNames::default()).unwrap_err();
    assert_matches!(err, KiraError::Schema(message) if message.contains("WFREQ"));
}

#[test]
fn connections_are_read_only() {
    let fixture = Fixture::dataset();
    let conn = fixture.store().connect().unwrap();
    let err = conn
        .execute("DELETE FROM samples_metadata", [])
        .unwrap_err();
    assert!(err.to_string().contains("readonly"));
}
