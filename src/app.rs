use std::time::Instant;

use tracing::debug;

use crate::domain::{OtuAbundance, SampleId, SampleMetadata};
use crate::error::KiraError;
use crate::query::QueryEngine;
use crate::store::Store;

#[derive(Debug, Clone)]
pub struct App {
    store: Store,
}

impl App {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn names(&self) -> Result<Vec<String>, KiraError> {
        let started = Instant::now();
        let names = self.with_engine(|engine| engine.list_sample_names())?;
        debug!(count = names.len(), elapsed = ?started.elapsed(), "listed sample names");
        Ok(names)
    }

    pub fn otu(&self) -> Result<Vec<Option<String>>, KiraError> {
        let started = Instant::now();
        let descriptions = self.with_engine(|engine| engine.list_otu_descriptions())?;
        debug!(count = descriptions.len(), elapsed = ?started.elapsed(), "listed otu descriptions");
        Ok(descriptions)
    }

    pub fn metadata(&self, sample: &str) -> Result<SampleMetadata, KiraError> {
        let id = SampleId::from_external(sample);
        let metadata = self.with_engine(|engine| engine.sample_metadata(&id))?;
        debug!(sample = %id, "fetched sample metadata");
        Ok(metadata)
    }

    pub fn wfreq(&self, sample: &str) -> Result<Option<i64>, KiraError> {
        let id = SampleId::from_external(sample);
        let frequency = self.with_engine(|engine| engine.wash_frequency(&id))?;
        debug!(sample = %id, ?frequency, "fetched wash frequency");
        Ok(frequency)
    }

    pub fn samples(&self, sample: &str) -> Result<OtuAbundance, KiraError> {
        let started = Instant::now();
        let id = SampleId::from_external(sample);
        let abundance = self.with_engine(|engine| engine.otu_abundance(&id))?;
        debug!(
            sample = %id,
            rows = abundance.len(),
            elapsed = ?started.elapsed(),
            "projected otu abundance"
        );
        Ok(abundance)
    }

    fn with_engine<T>(
        &self,
        op: impl FnOnce(&QueryEngine<'_>) -> Result<T, KiraError>,
    ) -> Result<T, KiraError> {
        let conn = self.store.connect()?;
        let engine = QueryEngine::new(&conn, self.store.catalog());
        op(&engine)
    }
}
