use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::KiraError;

pub const DEFAULT_CONFIG_FILE: &str = "kira-bd.json";
pub const DEFAULT_DATABASE: &str = "Resources/belly_button_biodiversity.sqlite";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub bind: Option<String>,
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    #[serde(default)]
    pub tables: Option<TableEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TableEntry {
    #[serde(default)]
    pub otu: Option<String>,
    #[serde(default)]
    pub samples: Option<String>,
    #[serde(default)]
    pub metadata: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    pub otu: String,
    pub samples: String,
    pub metadata: String,
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            otu: "otu".to_string(),
            samples: "samples".to_string(),
            metadata: "samples_metadata".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database: Option<String>,
    pub bind: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub database: Utf8PathBuf,
    pub bind: SocketAddr,
    pub request_timeout: Duration,
    pub tables: TableNames,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, KiraError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        let config = if path.is_none() && !config_path.exists() {
            Config::default()
        } else {
            let content = fs::read_to_string(&config_path)
                .map_err(|_| KiraError::ConfigRead(config_path.clone()))?;
            serde_json::from_str(&content).map_err(|err| KiraError::ConfigParse(err.to_string()))?
        };

        Self::resolve_config(config, overrides)
    }

    pub fn resolve_config(
        config: Config,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, KiraError> {
        let schema_version = config.schema_version.unwrap_or(1);

        let database = overrides
            .database
            .or(config.database)
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let bind = overrides
            .bind
            .or(config.bind)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind
            .parse::<SocketAddr>()
            .map_err(|err| KiraError::ConfigParse(format!("invalid bind address {bind}: {err}")))?;

        let timeout_ms = config
            .request_timeout_ms
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(KiraError::ConfigParse(
                "request_timeout_ms must be positive".to_string(),
            ));
        }

        let defaults = TableNames::default();
        let tables = match config.tables {
            Some(entry) => TableNames {
                otu: entry.otu.unwrap_or(defaults.otu),
                samples: entry.samples.unwrap_or(defaults.samples),
                metadata: entry.metadata.unwrap_or(defaults.metadata),
            },
            None => defaults,
        };

        Ok(ResolvedConfig {
            schema_version,
            database: Utf8PathBuf::from(database),
            bind,
            request_timeout: Duration::from_millis(timeout_ms),
            tables,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_config_empty() {
        let resolved =
            ConfigLoader::resolve_config(Config::default(), ConfigOverrides::default()).unwrap();
        assert_eq!(resolved.schema_version, 1);
        assert_eq!(resolved.database, Utf8PathBuf::from(DEFAULT_DATABASE));
        assert_eq!(resolved.bind.port(), 5000);
        assert_eq!(resolved.request_timeout, Duration::from_secs(5));
        assert_eq!(resolved.tables, TableNames::default());
    }

    #[test]
    fn overrides_win_over_file() {
        let config = Config {
            database: Some("from-file.sqlite".to_string()),
            bind: Some("0.0.0.0:8080".to_string()),
            ..Config::default()
        };
        let overrides = ConfigOverrides {
            database: Some("from-cli.sqlite".to_string()),
            bind: None,
        };

        let resolved = ConfigLoader::resolve_config(config, overrides).unwrap();
        assert_eq!(resolved.database.as_str(), "from-cli.sqlite");
        assert_eq!(resolved.bind.port(), 8080);
    }
}
