use std::collections::BTreeSet;

use rusqlite::{Connection, OptionalExtension};

use crate::config::TableNames;
use crate::domain::SampleId;
use crate::error::KiraError;

pub const OTU_ID: &str = "otu_id";
pub const OTU_DESCRIPTION: &str = "lowest_taxonomic_unit_found";

pub const META_SAMPLE_ID: &str = "SAMPLEID";
pub const META_AGE: &str = "AGE";
pub const META_BB_TYPE: &str = "BBTYPE";
pub const META_ETHNICITY: &str = "ETHNICITY";
pub const META_GENDER: &str = "GENDER";
pub const META_LOCATION: &str = "LOCATION";
pub const META_WASH_FREQUENCY: &str = "WFREQ";

const METADATA_COLUMNS: [&str; 7] = [
    META_SAMPLE_ID,
    META_AGE,
    META_BB_TYPE,
    META_ETHNICITY,
    META_GENDER,
    META_LOCATION,
    META_WASH_FREQUENCY,
];

#[derive(Debug, Clone)]
pub struct Catalog {
    tables: TableNames,
    sample_columns: BTreeSet<String>,
}

impl Catalog {
    pub fn load(conn: &Connection, tables: &TableNames) -> Result<Self, KiraError> {
        let otu_columns = table_columns(conn, &tables.otu)?;
        require_columns(&tables.otu, &otu_columns, &[OTU_ID, OTU_DESCRIPTION])?;

        let metadata_columns = table_columns(conn, &tables.metadata)?;
        require_columns(&tables.metadata, &metadata_columns, &METADATA_COLUMNS)?;

        let abundance_columns = table_columns(conn, &tables.samples)?;
        require_columns(&tables.samples, &abundance_columns, &[OTU_ID])?;

        let sample_columns = abundance_columns
            .into_iter()
            .filter(|name| !name.eq_ignore_ascii_case(OTU_ID))
            .collect();

        Ok(Self {
            tables: tables.clone(),
            sample_columns,
        })
    }

    pub fn tables(&self) -> &TableNames {
        &self.tables
    }

    pub fn sample_columns(&self) -> &BTreeSet<String> {
        &self.sample_columns
    }

    /// Matches the bare id first, then the `BB_` form used by the published
    /// dataset. Only names returned here may be spliced into SQL.
    pub fn resolve_sample_column(&self, id: &SampleId) -> Option<&str> {
        self.sample_columns
            .get(id.as_str())
            .or_else(|| self.sample_columns.get(&id.external_name()))
            .map(String::as_str)
    }
}

pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, KiraError> {
    let exists = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(KiraError::Schema(format!("table {table} not found")));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn require_columns(table: &str, columns: &[String], required: &[&str]) -> Result<(), KiraError> {
    let missing = required
        .iter()
        .filter(|name| !columns.iter().any(|col| col.eq_ignore_ascii_case(name)))
        .copied()
        .collect::<Vec<_>>();
    if missing.is_empty() {
        return Ok(());
    }
    Err(KiraError::Schema(format!(
        "table {table} is missing column(s): {}",
        missing.join(", ")
    )))
}
