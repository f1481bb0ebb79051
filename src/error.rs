use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum KiraError {
    #[error("schema error: {0}")]
    #[diagnostic(help("check that the database holds the otu, samples and samples_metadata tables"))]
    Schema(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("abundance matrix has no rows for sample {0}")]
    EmptyResult(String),

    #[error("unknown sample column: {0}")]
    InvalidColumn(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("server error: {0}")]
    Server(String),
}

impl From<rusqlite::Error> for KiraError {
    fn from(err: rusqlite::Error) -> Self {
        KiraError::Database(err.to_string())
    }
}
