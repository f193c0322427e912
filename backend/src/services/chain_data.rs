use std::sync::Arc;

use crate::{
    constants::DEFAULT_TOP_USERS_LIMIT,
    db::SharedStore,
    errors::{ServiceError, ServiceResult, ValidationErrors},
    models::{Address, ConnectionState, Profile, RankingEntry, Transaction, TxReceipt},
    services::identity::{IdentityProvider, NoWallet},
    utils::validate_profile,
};

/// Boundary between callers and the chain: wallet identity, profile and
/// ranking reads, and the two writes (profile save, star giving).
///
/// Holds no connection state. `connect` hands back a [`ConnectionState`]
/// which callers pass into every write.
#[derive(Clone)]
pub struct ChainDataService {
    store: SharedStore,
    identity: Arc<dyn IdentityProvider>,
}

impl ChainDataService {
    pub fn new(store: SharedStore, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Service that can read but never connect.
    pub fn read_only(store: SharedStore) -> Self {
        Self::new(store, Arc::new(NoWallet))
    }

    pub async fn connect(&self) -> ServiceResult<ConnectionState> {
        match self.identity.connect().await {
            Ok(address) => {
                tracing::info!("Wallet connected: {}", address);
                Ok(ConnectionState::Connected(address))
            }
            Err(e) => {
                tracing::warn!("Wallet connection failed: {}", e);
                Err(e)
            }
        }
    }

    pub fn disconnect(&self, state: ConnectionState) -> ConnectionState {
        if let Some(address) = state.address() {
            tracing::info!("Wallet disconnected: {}", address);
        }
        ConnectionState::Disconnected
    }

    /// Profile for `address`; the default profile if none was saved.
    pub async fn get_profile(&self, address: &Address) -> ServiceResult<Profile> {
        Ok(self.store.profile(address).await?.unwrap_or_default())
    }

    pub async fn save_profile(
        &self,
        state: &ConnectionState,
        profile: Profile,
    ) -> ServiceResult<TxReceipt> {
        let sender = state.address().ok_or(ServiceError::NotConnected)?;
        validate_profile(&profile)?;

        let tx = Transaction::save_profile(sender.clone(), profile.normalized());
        let receipt = self.sign_and_send(tx).await?;
        tracing::info!("Profile saved for {} in {}", sender, receipt.tx_hash);
        Ok(receipt)
    }

    /// Give one star to `to`. With an idempotency key, a retried call
    /// returns the first receipt instead of counting twice.
    pub async fn give_star(
        &self,
        state: &ConnectionState,
        to: &Address,
        idempotency_key: Option<String>,
    ) -> ServiceResult<TxReceipt> {
        let sender = state.address().ok_or(ServiceError::NotConnected)?;
        if sender == to {
            tracing::warn!("Rejected self-star from {}", sender);
            return Err(ServiceError::SelfStarNotAllowed);
        }

        let tx = Transaction::give_star(sender.clone(), to.clone())
            .with_idempotency_key(idempotency_key);
        let receipt = self.sign_and_send(tx).await?;
        if receipt.replayed {
            tracing::info!("Replayed star {} -> {} ({})", sender, to, receipt.tx_hash);
        } else {
            tracing::info!("Star given {} -> {} in {}", sender, to, receipt.tx_hash);
        }
        Ok(receipt)
    }

    /// Like [`give_star`](Self::give_star) but takes the recipient as
    /// untrusted input.
    pub async fn give_star_to(
        &self,
        state: &ConnectionState,
        to: &str,
        idempotency_key: Option<String>,
    ) -> ServiceResult<TxReceipt> {
        if !state.is_connected() {
            return Err(ServiceError::NotConnected);
        }
        let to = Address::parse(to).map_err(|e| {
            ServiceError::Validation(ValidationErrors::single("to_address", e.to_string()))
        })?;
        self.give_star(state, &to, idempotency_key).await
    }

    pub async fn get_stars(&self, address: &Address) -> ServiceResult<u64> {
        self.store.stars(address).await
    }

    pub async fn get_top_users(&self, limit: usize) -> ServiceResult<Vec<RankingEntry>> {
        self.store.top_users(limit).await
    }

    pub async fn get_top_users_default(&self) -> ServiceResult<Vec<RankingEntry>> {
        self.get_top_users(DEFAULT_TOP_USERS_LIMIT).await
    }

    async fn sign_and_send(&self, tx: Transaction) -> ServiceResult<TxReceipt> {
        let signed = self.identity.sign(tx).await?;
        self.store.send(signed).await.map_err(|e| {
            match &e {
                ServiceError::Network(_) => tracing::error!("Store unavailable: {}", e),
                _ => tracing::warn!("Transaction rejected ({}): {}", e.kind(), e),
            }
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::services::identity::StaticIdentity;

    fn addr(raw: &str) -> Address {
        Address::parse(raw).unwrap()
    }

    fn service_as(store: &SharedStore, address: &str) -> ChainDataService {
        ChainDataService::new(store.clone(), Arc::new(StaticIdentity::approving(addr(address))))
    }

    fn memory_store() -> SharedStore {
        Arc::new(MemoryStore::new())
    }

    #[tokio::test]
    async fn test_save_then_get_profile_round_trip() {
        let store = memory_store();
        let service = service_as(&store, "0xABC");
        let session = service.connect().await.unwrap();
        assert_eq!(session, ConnectionState::Connected(addr("0xABC")));

        let profile = Profile::new("Ana").with_github("https://github.com/ana");
        let receipt = service.save_profile(&session, profile.clone()).await.unwrap();
        assert!(!receipt.replayed);

        // Visible to any caller, not just the writer.
        let reader = ChainDataService::read_only(store.clone());
        let stored = reader.get_profile(&addr("0xABC")).await.unwrap();
        assert_eq!(stored, profile);
        assert_eq!(stored.linkedin, "");
        assert_eq!(stored.twitter, "");
    }

    #[tokio::test]
    async fn test_unknown_profile_is_default() {
        let service = ChainDataService::read_only(memory_store());
        let profile = service.get_profile(&addr("0xNOBODY")).await.unwrap();
        assert_eq!(profile, Profile::default());
    }

    #[tokio::test]
    async fn test_save_profile_requires_connection() {
        let store = memory_store();
        let service = service_as(&store, "0xB0B");

        let err = service
            .save_profile(&ConnectionState::Disconnected, Profile::new("Bob"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotConnected));
        assert_eq!(service.get_profile(&addr("0xB0B")).await.unwrap(), Profile::default());
    }

    #[tokio::test]
    async fn test_empty_name_leaves_profile_untouched() {
        let store = memory_store();
        let service = service_as(&store, "0xABC");
        let session = service.connect().await.unwrap();
        service.save_profile(&session, Profile::new("Ana")).await.unwrap();

        let err = service
            .save_profile(&session, Profile::new("").with_github("https://github.com/ana"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert!(errors.get("name").is_some()),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(service.get_profile(&addr("0xABC")).await.unwrap(), Profile::new("Ana"));
    }

    #[tokio::test]
    async fn test_save_profile_rejects_bad_social_url() {
        let store = memory_store();
        let service = service_as(&store, "0xABC");
        let session = service.connect().await.unwrap();

        let err = service
            .save_profile(&session, Profile::new("Ana").with_twitter("https://facebook.com/ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_save_profile_trims_fields() {
        let store = memory_store();
        let service = service_as(&store, "0xABC");
        let session = service.connect().await.unwrap();

        service.save_profile(&session, Profile::new("  Ana  ")).await.unwrap();
        assert_eq!(service.get_profile(&addr("0xABC")).await.unwrap().name, "Ana");
    }

    #[tokio::test]
    async fn test_self_star_rejected_and_balance_unchanged() {
        let store = memory_store();
        let service = service_as(&store, "0xA");
        let session = service.connect().await.unwrap();

        let err = service.give_star(&session, &addr("0xA"), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::SelfStarNotAllowed));
        assert_eq!(service.get_stars(&addr("0xA")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_each_star_increments_by_one() {
        let store = memory_store();
        let service = service_as(&store, "0xA");
        let session = service.connect().await.unwrap();
        let target = addr("0xB");

        for expected in 1..=3 {
            service.give_star(&session, &target, None).await.unwrap();
            assert_eq!(service.get_stars(&target).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn test_give_star_requires_connection() {
        let store = memory_store();
        let service = service_as(&store, "0xA");
        let err = service
            .give_star(&ConnectionState::Disconnected, &addr("0xB"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotConnected));
        assert_eq!(service.get_stars(&addr("0xB")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_give_star_to_validates_recipient() {
        let store = memory_store();
        let service = service_as(&store, "0xA");
        let session = service.connect().await.unwrap();

        let err = service.give_star_to(&session, "   ", None).await.unwrap_err();
        match err {
            ServiceError::Validation(errors) => assert!(errors.get("to_address").is_some()),
            other => panic!("expected validation error, got {:?}", other),
        }

        let err = service
            .give_star_to(&ConnectionState::Disconnected, "0xB", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotConnected));
    }

    #[tokio::test]
    async fn test_retry_with_same_key_counts_once() {
        let store = memory_store();
        let service = service_as(&store, "0xA");
        let session = service.connect().await.unwrap();
        let key = Some("star-0xB-1".to_string());

        let first = service.give_star(&session, &addr("0xB"), key.clone()).await.unwrap();
        let retry = service.give_star(&session, &addr("0xB"), key).await.unwrap();
        assert_eq!(first.tx_hash, retry.tx_hash);
        assert!(retry.replayed);
        assert_eq!(service.get_stars(&addr("0xB")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_key_reused_for_another_recipient_fails() {
        let store = memory_store();
        let service = service_as(&store, "0xA");
        let session = service.connect().await.unwrap();
        let key = Some("k".to_string());

        service.give_star(&session, &addr("0xB"), key.clone()).await.unwrap();
        let err = service.give_star(&session, &addr("0xC"), key).await.unwrap_err();
        assert!(matches!(err, ServiceError::TransactionFailed(_)));

        assert_eq!(service.get_stars(&addr("0xB")).await.unwrap(), 1);
        assert_eq!(service.get_stars(&addr("0xC")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sixth_star_of_the_day_fails() {
        let store = memory_store();
        let service = service_as(&store, "0xA");
        let session = service.connect().await.unwrap();

        for i in 0..crate::constants::DAILY_STAR_LIMIT {
            service.give_star(&session, &addr(&format!("0xB{}", i)), None).await.unwrap();
        }
        let err = service.give_star(&session, &addr("0xC"), None).await.unwrap_err();
        assert!(matches!(err, ServiceError::TransactionFailed(_)));
        assert_eq!(service.get_stars(&addr("0xC")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_top_users_scenario() {
        let store: SharedStore = Arc::new(MemoryStore::with_balances([
            (addr("A"), 50),
            (addr("B"), 90),
            (addr("C"), 10),
        ]));
        let service = ChainDataService::read_only(store);

        let top = service.get_top_users(3).await.unwrap();
        let got: Vec<_> = top.iter().map(|e| (e.address.as_str(), e.stars)).collect();
        assert_eq!(got, vec![("B", 90), ("A", 50), ("C", 10)]);

        assert_eq!(service.get_top_users(2).await.unwrap().len(), 2);
        assert!(service.get_top_users(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_top_users_default_limit_and_empty() {
        let empty = ChainDataService::read_only(memory_store());
        assert!(empty.get_top_users_default().await.unwrap().is_empty());

        let balances = (0..15u64).map(|i| (addr(&format!("user{}.eth", i)), i + 1));
        let service = ChainDataService::read_only(Arc::new(MemoryStore::with_balances(balances)));
        let top = service.get_top_users_default().await.unwrap();
        assert_eq!(top.len(), DEFAULT_TOP_USERS_LIMIT);
        assert!(top.windows(2).all(|w| w[0].stars >= w[1].stars));
        assert_eq!(top[0].stars, 15);
    }

    #[tokio::test]
    async fn test_connect_failures_propagate() {
        let store = memory_store();
        for (identity, kind) in [
            (StaticIdentity::absent(), "not_available"),
            (StaticIdentity::rejecting(), "user_rejected"),
            (StaticIdentity::offline(), "network_error"),
        ] {
            let service = ChainDataService::new(store.clone(), Arc::new(identity));
            assert_eq!(service.connect().await.unwrap_err().kind(), kind);
        }
    }

    #[tokio::test]
    async fn test_rejected_signature_writes_nothing() {
        let store = memory_store();
        let service = ChainDataService::new(
            store.clone(),
            Arc::new(StaticIdentity::rejecting_signatures(addr("0xA"))),
        );
        let session = service.connect().await.unwrap();

        let err = service.save_profile(&session, Profile::new("Ana")).await.unwrap_err();
        assert!(matches!(err, ServiceError::UserRejected));
        assert_eq!(service.get_profile(&addr("0xA")).await.unwrap(), Profile::default());
    }

    #[tokio::test]
    async fn test_disconnect_clears_state() {
        let service = service_as(&memory_store(), "0xA");
        let session = service.connect().await.unwrap();
        let session = service.disconnect(session);
        assert!(!session.is_connected());
        assert!(matches!(
            service.save_profile(&session, Profile::new("Ana")).await,
            Err(ServiceError::NotConnected)
        ));
    }
}
