//! Process configuration read from the environment (after `.env` is loaded).

use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Non-durable, for local runs without a database.
    Memory,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL must be set when CRALY_STORE=postgres")]
    MissingDatabaseUrl,
    #[error("CRALY_STORE must be 'postgres' or 'memory', got '{0}'")]
    UnknownStore(String),
    #[error("{name} is not a valid number: '{value}'")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend = match lookup("CRALY_STORE")
            .unwrap_or_else(|| "postgres".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "postgres" | "" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => return Err(ConfigError::UnknownStore(other.to_string())),
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            backend,
            database_url,
            max_connections: parse_or(
                &lookup,
                "CRALY_DB_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
    }
}
