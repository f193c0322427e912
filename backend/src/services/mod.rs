pub mod chain_data;
pub mod gateway;
pub mod identity;

pub use chain_data::ChainDataService;
pub use gateway::{GatewayClient, GatewayStatus};
pub use identity::{HeaderIdentity, IdentityProvider, NoWallet, StaticIdentity};
