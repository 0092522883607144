use error_stack::{Report, ResultExt};
use std::str::FromStr;

pub const MONGODB_URI_VAR: &str = "MONGODB_URI";
pub const PORT_VAR: &str = "PORT";
pub const STORAGE_VAR: &str = "ITEMS_STORAGE";
pub const METRICS_VAR: &str = "ITEMS_METRICS";

const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, thiserror::Error)]
#[error("invalid configuration")]
pub struct ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    MongoDb { uri: String },
    Memory,
}

/// Settings read once at start up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub storage: Storage,
    pub metrics: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report<ConfigError>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<L>(lookup: L) -> Result<Self, Report<ConfigError>>
    where
        L: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, PORT_VAR, DEFAULT_PORT)?;
        let metrics = match lookup(METRICS_VAR) {
            None => false,
            Some(raw) => items_core::cast::parse_flag(&raw)
                .ok_or_else(|| Report::new(ConfigError))
                .attach_with(|| format!("{METRICS_VAR} must be true or false, got '{raw}'"))?,
        };

        let storage = match lookup(STORAGE_VAR).as_deref() {
            None | Some("mongodb") => Storage::MongoDb {
                uri: lookup(MONGODB_URI_VAR)
                    .ok_or_else(|| Report::new(ConfigError))
                    .attach_with(|| format!("{MONGODB_URI_VAR} is missing"))?,
            },
            Some("memory") => Storage::Memory,
            Some(other) => {
                return Err(Report::new(ConfigError)).attach_with(|| {
                    format!("{STORAGE_VAR} must be mongodb or memory, got '{other}'")
                });
            }
        };

        Ok(Self {
            port,
            storage,
            metrics,
        })
    }
}

fn parse_or<L, T>(lookup: &L, key: &str, default: T) -> Result<T, Report<ConfigError>>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .change_context(ConfigError)
            .attach_with(|| format!("{key} has an invalid value '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, Report<ConfigError>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_to_mongodb_on_3001() {
        let config = config(&[(MONGODB_URI_VAR, "mongodb://localhost/items")]).unwrap();

        assert_eq!(
            AppConfig {
                port: 3001,
                storage: Storage::MongoDb {
                    uri: "mongodb://localhost/items".to_string()
                },
                metrics: false,
            },
            config
        );
    }

    #[test]
    fn mongodb_needs_a_uri() {
        assert!(config(&[]).is_err());
        assert!(config(&[(STORAGE_VAR, "mongodb")]).is_err());
    }

    #[test]
    fn memory_storage_needs_no_uri() {
        let config = config(&[(STORAGE_VAR, "memory"), (PORT_VAR, "8080"), (METRICS_VAR, "true")])
            .unwrap();

        assert_eq!(Storage::Memory, config.storage);
        assert_eq!(8080, config.port);
        assert!(config.metrics);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(config(&[(STORAGE_VAR, "memory"), (PORT_VAR, "eighty")]).is_err());
        assert!(config(&[(STORAGE_VAR, "memory"), (METRICS_VAR, "sometimes")]).is_err());
        assert!(config(&[(STORAGE_VAR, "postgres")]).is_err());
    }
}
