use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    constants::DAILY_STAR_LIMIT,
    errors::{ServiceError, ServiceResult},
    models::{Address, Profile, RankingEntry, SignedTransaction, TxReceipt},
};

/// The backing chain/store. Sole source of truth for profiles and star
/// balances; the service layer above it holds no state of its own.
#[async_trait]
pub trait ChainStore: Send + Sync {
    /// Saved profile for `address`, or `None` when it never saved one.
    async fn profile(&self, address: &Address) -> ServiceResult<Option<Profile>>;

    async fn stars(&self, address: &Address) -> ServiceResult<u64>;

    /// At most `limit` addresses ordered by stars descending, then address
    /// ascending.
    async fn top_users(&self, limit: usize) -> ServiceResult<Vec<RankingEntry>>;

    /// Apply a signed write atomically. Either the whole transaction is
    /// applied and a receipt returned, or nothing changes.
    async fn send(&self, signed: SignedTransaction) -> ServiceResult<TxReceipt>;
}

pub type SharedStore = Arc<dyn ChainStore>;

/// Chain-side rules for a star: no self-stars and at most
/// `DAILY_STAR_LIMIT` per sender per day.
pub(crate) fn check_star_policy(sender: &Address, to: &Address, given_today: u64) -> ServiceResult<()> {
    if sender == to {
        return Err(ServiceError::SelfStarNotAllowed);
    }
    if given_today >= DAILY_STAR_LIMIT {
        return Err(ServiceError::TransactionFailed("daily star limit reached".to_string()));
    }
    Ok(())
}

/// Outcome of a repeated idempotency key: replay the earlier receipt when the
/// payload matches, refuse otherwise.
pub(crate) fn replay_previous(
    tx_hash: String,
    stored_fingerprint: &str,
    fingerprint: &str,
) -> ServiceResult<TxReceipt> {
    if stored_fingerprint != fingerprint {
        return Err(ServiceError::TransactionFailed(
            "idempotency key reused for a different transaction".to_string(),
        ));
    }
    Ok(TxReceipt::replay_of(tx_hash))
}

pub(crate) fn check_signer(signed: &SignedTransaction) -> ServiceResult<()> {
    if signed.signature.is_empty() {
        return Err(ServiceError::TransactionFailed("transaction is not signed".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(raw: &str) -> Address {
        Address::parse(raw).unwrap()
    }

    #[test]
    fn test_replay_requires_matching_fingerprint() {
        let receipt = replay_previous("0x01".to_string(), "give_star:b", "give_star:b").unwrap();
        assert!(receipt.replayed);
        assert_eq!(receipt.tx_hash, "0x01");

        assert!(matches!(
            replay_previous("0x01".to_string(), "give_star:b", "give_star:c"),
            Err(ServiceError::TransactionFailed(_))
        ));
    }

    #[test]
    fn test_star_policy() {
        assert!(check_star_policy(&addr("a"), &addr("b"), 0).is_ok());
        assert!(check_star_policy(&addr("a"), &addr("b"), DAILY_STAR_LIMIT - 1).is_ok());
        assert!(matches!(
            check_star_policy(&addr("a"), &addr("a"), 0),
            Err(ServiceError::SelfStarNotAllowed)
        ));
        assert!(matches!(
            check_star_policy(&addr("a"), &addr("b"), DAILY_STAR_LIMIT),
            Err(ServiceError::TransactionFailed(_))
        ));
    }
}
