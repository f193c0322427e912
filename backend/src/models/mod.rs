pub mod address;
pub mod profile;
pub mod ranking;
pub mod session;
pub mod transaction;

pub use address::{Address, InvalidAddress};
pub use profile::{Profile, ProfileField};
pub use ranking::{Medal, RankedUser, RankingEntry};
pub use session::ConnectionState;
pub use transaction::{SignedTransaction, Transaction, TxAction, TxReceipt};
