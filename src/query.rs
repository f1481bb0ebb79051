use rusqlite::Connection;
use rusqlite::types::ValueRef;

use crate::catalog::{
    Catalog, META_AGE, META_BB_TYPE, META_ETHNICITY, META_GENDER, META_LOCATION, META_SAMPLE_ID,
    META_WASH_FREQUENCY, OTU_DESCRIPTION, OTU_ID, quote_ident,
};
use crate::domain::{OtuAbundance, SampleId, SampleMetadata};
use crate::error::KiraError;

pub struct QueryEngine<'a> {
    conn: &'a Connection,
    catalog: &'a Catalog,
}

impl<'a> QueryEngine<'a> {
    pub fn new(conn: &'a Connection, catalog: &'a Catalog) -> Self {
        Self { conn, catalog }
    }

    pub fn list_sample_names(&self) -> Result<Vec<String>, KiraError> {
        let sql = format!(
            "SELECT {} FROM {}",
            quote_ident(META_SAMPLE_ID),
            quote_ident(&self.catalog.tables().metadata)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            let id = sample_id_text(row.get_ref(0)?)?;
            names.push(SampleId::from_internal(id).external_name());
        }
        Ok(names)
    }

    pub fn list_otu_descriptions(&self) -> Result<Vec<Option<String>>, KiraError> {
        let sql = format!(
            "SELECT {} FROM {}",
            quote_ident(OTU_DESCRIPTION),
            quote_ident(&self.catalog.tables().otu)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let descriptions = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(descriptions)
    }

    pub fn sample_metadata(&self, id: &SampleId) -> Result<SampleMetadata, KiraError> {
        let sql = format!(
            "SELECT {}, {}, {}, {}, {}, {} FROM {} WHERE {} = ?1 LIMIT 2",
            quote_ident(META_SAMPLE_ID),
            quote_ident(META_AGE),
            quote_ident(META_BB_TYPE),
            quote_ident(META_ETHNICITY),
            quote_ident(META_GENDER),
            quote_ident(META_LOCATION),
            quote_ident(&self.catalog.tables().metadata),
            quote_ident(META_SAMPLE_ID),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut matches = stmt
            .query_map([id.as_str()], |row| {
                Ok(SampleMetadata {
                    sample_id: row.get(0)?,
                    age: row.get(1)?,
                    bb_type: row.get(2)?,
                    ethnicity: row.get(3)?,
                    gender: row.get(4)?,
                    location: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(KiraError::NotFound(format!(
                "no metadata for sample {}",
                id.external_name()
            ))),
            _ => Err(KiraError::NotFound(format!(
                "multiple metadata rows for sample {}",
                id.external_name()
            ))),
        }
    }

    pub fn wash_frequency(&self, id: &SampleId) -> Result<Option<i64>, KiraError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 LIMIT 2",
            quote_ident(META_WASH_FREQUENCY),
            quote_ident(&self.catalog.tables().metadata),
            quote_ident(META_SAMPLE_ID),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut matches = stmt
            .query_map([id.as_str()], |row| row.get::<_, Option<i64>>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        match matches.len() {
            1 => Ok(matches.remove(0)),
            0 => Err(KiraError::NotFound(format!(
                "no wash frequency for sample {}",
                id.external_name()
            ))),
            _ => Err(KiraError::NotFound(format!(
                "multiple metadata rows for sample {}",
                id.external_name()
            ))),
        }
    }

    // equal counts keep whatever order SQLite returns them in
    pub fn otu_abundance(&self, id: &SampleId) -> Result<OtuAbundance, KiraError> {
        let column = self
            .catalog
            .resolve_sample_column(id)
            .ok_or_else(|| KiraError::InvalidColumn(id.external_name()))?;
        let column_name = column;
        let column = quote_ident(column);
        let sql = format!(
            "SELECT {}, {column} FROM {} ORDER BY {column} DESC",
            quote_ident(OTU_ID),
            quote_ident(&self.catalog.tables().samples),
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, Option<i64>>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if rows.is_empty() {
            return Err(KiraError::EmptyResult(id.external_name()));
        }
        let rows = rows
            .into_iter()
            .map(|(otu_id, count)| {
                count.map(|count| (otu_id, count)).ok_or_else(|| {
                    KiraError::Database(format!(
                        "NULL count for otu_id {otu_id} in column {column_name}"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OtuAbundance::from_rows(rows))
    }
}

fn sample_id_text(value: ValueRef<'_>) -> Result<String, KiraError> {
    match value {
        ValueRef::Integer(id) => Ok(id.to_string()),
        ValueRef::Text(text) => Ok(String::from_utf8_lossy(text).into_owned()),
        other => Err(KiraError::Database(format!(
            "unexpected {} value in {META_SAMPLE_ID}",
            other.data_type()
        ))),
    }
}
