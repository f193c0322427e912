pub mod connection;
pub mod memory;
pub mod migrations;
pub mod postgres;
pub mod store;

use std::sync::Arc;

use anyhow::Result;

pub use connection::{get_db_pool, DatabaseConfig};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{ChainStore, SharedStore};

use crate::utils::{Config, StoreBackend};

/// Build the store selected by `config`, running migrations for Postgres.
pub async fn open_store(config: &Config) -> Result<SharedStore> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let db_config = DatabaseConfig::from_config(config)?;
            let pool = get_db_pool(&db_config).await?;
            migrations::run_migrations(&pool).await?;
            tracing::info!("Connected to Postgres store");
            Ok(Arc::new(PgStore::new(pool)))
        }
    }
}
