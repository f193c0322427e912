use anyhow::Result;
use std::env;
use crate::constants::{DEFAULT_CHAIN_GATEWAY_URL, DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_SERVER_PORT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub chain_gateway_url: String,
    pub allowed_origins: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if present
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let store_backend = match lookup("STORE_BACKEND").as_deref().map(str::trim) {
            Some("memory") => StoreBackend::Memory,
            Some("postgres") => StoreBackend::Postgres,
            Some(other) => {
                return Err(anyhow::anyhow!(
                    "STORE_BACKEND must be 'memory' or 'postgres', got '{}'",
                    other
                ));
            }
            None if database_url.is_some() => StoreBackend::Postgres,
            None => StoreBackend::Memory,
        };

        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(anyhow::anyhow!("DATABASE_URL must be set for the postgres store"));
        }

        let allowed_origins = lookup("ALLOWED_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        Ok(Self {
            port: lookup("PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            store_backend,
            database_url,
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            chain_gateway_url: lookup("CHAIN_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_CHAIN_GATEWAY_URL.to_string()),
            allowed_origins,
        })
    }

    /// In-memory configuration for tests and local demos.
    pub fn in_memory() -> Self {
        Self {
            port: DEFAULT_SERVER_PORT,
            store_backend: StoreBackend::Memory,
            database_url: None,
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            chain_gateway_url: DEFAULT_CHAIN_GATEWAY_URL.to_string(),
            allowed_origins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_memory_store() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert_eq!(config.port, DEFAULT_SERVER_PORT);
        assert_eq!(config.chain_gateway_url, DEFAULT_CHAIN_GATEWAY_URL);
        assert!(config.allowed_origins.is_none());
    }

    #[test]
    fn test_database_url_selects_postgres() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/oracle"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_postgres_requires_database_url() {
        let result = Config::from_lookup(lookup_from(&[("STORE_BACKEND", "postgres")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_backend_rejected() {
        assert!(Config::from_lookup(lookup_from(&[("STORE_BACKEND", "mongo")])).is_err());
    }

    #[test]
    fn test_allowed_origins_parsed() {
        let config = Config::from_lookup(lookup_from(&[(
            "ALLOWED_ORIGINS",
            "https://a.example, ,https://b.example",
        )]))
        .unwrap();
        assert_eq!(
            config.allowed_origins.unwrap(),
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }
}
