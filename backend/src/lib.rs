pub mod constants;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod server;
pub mod services;
pub mod utils;

pub use utils::config::Config;
pub use db::{open_store, ChainStore, SharedStore};
pub use errors::{ServiceError, ServiceResult};
pub use services::ChainDataService;

// Re-export common types
pub use anyhow::Result;
