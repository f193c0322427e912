pub mod config;
pub mod logging;
pub mod validation;

pub use config::{Config, StoreBackend};
pub use logging::init_logging;
pub use validation::validate_profile;
