use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, OpenFlags};
use tracing::info;

use crate::catalog::Catalog;
use crate::config::TableNames;
use crate::error::KiraError;

const READONLY_PRAGMAS: &str = "PRAGMA query_only=ON; PRAGMA temp_store=MEMORY;";

#[derive(Debug, Clone)]
pub struct Store {
    database: Utf8PathBuf,
    catalog: Arc<Catalog>,
}

impl Store {
    pub fn open(database: &Utf8Path, tables: &TableNames) -> Result<Self, KiraError> {
        if !database.as_std_path().is_file() {
            return Err(KiraError::Schema(format!("database not found at {database}")));
        }
        let conn = open_readonly(database)?;
        let catalog = Catalog::load(&conn, tables)?;
        info!(
            database = %database,
            samples = catalog.sample_columns().len(),
            "schema catalog loaded"
        );
        Ok(Self {
            database: database.to_path_buf(),
            catalog: Arc::new(catalog),
        })
    }

    pub fn database(&self) -> &Utf8Path {
        &self.database
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn connect(&self) -> Result<Connection, KiraError> {
        open_readonly(&self.database)
    }
}

fn open_readonly(path: &Utf8Path) -> Result<Connection, KiraError> {
    let conn = Connection::open_with_flags(
        path.as_std_path(),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    conn.execute_batch(READONLY_PRAGMAS)?;
    Ok(conn)
}
