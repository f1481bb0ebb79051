#![allow(dead_code)]

use camino::Utf8PathBuf;
use rusqlite::Connection;
use tempfile::TempDir;

use kira_biodiversity::app::App;
use kira_biodiversity::config::TableNames;
use kira_biodiversity::store::Store;

pub const BASE_SCHEMA: &str = "
    CREATE TABLE otu (otu_id INTEGER PRIMARY KEY, lowest_taxonomic_unit_found TEXT);
    CREATE TABLE samples_metadata (
        SAMPLEID INTEGER, EVENT TEXT, ETHNICITY TEXT, GENDER TEXT, AGE INTEGER,
        WFREQ INTEGER, BBTYPE TEXT, LOCATION TEXT, COUNTRY012 TEXT
    );
";

pub const DATASET: &str = "
    CREATE TABLE samples (otu_id INTEGER, BB_940 INTEGER, BB_941 INTEGER, BB_943 INTEGER);
    INSERT INTO otu VALUES (1, 'Archaea;Euryarchaeota;Halobacteria'), (2, 'Bacteria'), (3, ''), (4, NULL), (5, 'Bacteria');
    INSERT INTO samples_metadata VALUES
        (940, 'BellyButtonsScienceOnline', 'Caucasian', 'F', 24, 3, 'I', 'Beaufort/NC', 'usa'),
        (941, 'BellyButtonsScienceOnline', 'Caucasian/Midleastern', 'F', 34, NULL, 'I', 'Chicago/IL', 'usa'),
        (943, 'BellyButtonsScienceOnline', 'Caucasian', 'F', 49, 1, 'I', 'Omaha/NE', 'usa');
    INSERT INTO samples VALUES
        (1, 5, 0, 3),
        (2, 10, 2, 3),
        (3, 0, 7, 1),
        (4, 44, 0, 0),
        (5, 1, 1, 12);
";

pub struct Fixture {
    _dir: TempDir,
    pub path: Utf8PathBuf,
}

impl Fixture {
    pub fn new(sql: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("belly_button_biodiversity.sqlite"))
            .unwrap();
        let conn = Connection::open(path.as_std_path()).unwrap();
        conn.execute_batch(sql).unwrap();
        Self { _dir: dir, path }
    }

    pub fn dataset() -> Self {
        Self::new(&format!("{BASE_SCHEMA}{DATASET}"))
    }

    pub fn store(&self) -> Store {
        Store::open(&self.path, &TableNames::default()).unwrap()
    }

    pub fn app(&self) -> App {
        App::new(self.store())
    }
}
