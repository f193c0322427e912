use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{check_signer, check_star_policy, replay_previous, ChainStore};
use crate::{
    errors::ServiceResult,
    models::{Address, Profile, RankingEntry, SignedTransaction, TxAction, TxReceipt},
};

#[derive(Debug, Default)]
struct Ledger {
    profiles: HashMap<Address, Profile>,
    stars: HashMap<Address, u64>,
    // (sender, day) -> stars given that day; past days are pruned
    given_per_day: HashMap<(Address, i64), u64>,
    // (sender, idempotency key) -> (tx hash, fingerprint). Kept for the life
    // of the store, so memory grows with the number of keyed writes.
    receipts: HashMap<(Address, String), (String, String)>,
}

/// Deterministic in-memory store. Each transaction is applied under a single
/// write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: RwLock<Ledger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with star balances.
    pub fn with_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = (Address, u64)>,
    {
        let ledger = Ledger {
            stars: balances.into_iter().collect(),
            ..Ledger::default()
        };
        Self {
            ledger: RwLock::new(ledger),
        }
    }

    /// Store pre-loaded with profiles, bypassing transactions.
    pub async fn insert_profile(&self, address: Address, profile: Profile) {
        self.ledger.write().await.profiles.insert(address, profile);
    }
}

#[async_trait]
impl ChainStore for MemoryStore {
    async fn profile(&self, address: &Address) -> ServiceResult<Option<Profile>> {
        Ok(self.ledger.read().await.profiles.get(address).cloned())
    }

    async fn stars(&self, address: &Address) -> ServiceResult<u64> {
        Ok(self.ledger.read().await.stars.get(address).copied().unwrap_or(0))
    }

    async fn top_users(&self, limit: usize) -> ServiceResult<Vec<RankingEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let ledger = self.ledger.read().await;
        let mut entries: Vec<RankingEntry> = ledger
            .stars
            .iter()
            .filter(|(_, stars)| **stars > 0)
            .map(|(address, stars)| RankingEntry::new(address.clone(), *stars))
            .collect();

        entries.sort_by(|a, b| b.stars.cmp(&a.stars).then_with(|| a.address.cmp(&b.address)));
        entries.truncate(limit);
        Ok(entries)
    }

    async fn send(&self, signed: SignedTransaction) -> ServiceResult<TxReceipt> {
        check_signer(&signed)?;
        let tx = signed.tx;
        let mut ledger = self.ledger.write().await;

        let replay_key = tx
            .idempotency_key
            .as_ref()
            .map(|key| (tx.sender.clone(), key.clone()));
        if let Some(key) = &replay_key {
            if let Some((hash, fingerprint)) = ledger.receipts.get(key) {
                return replay_previous(hash.clone(), fingerprint, &tx.fingerprint());
            }
        }

        match &tx.action {
            TxAction::SaveProfile { profile } => {
                ledger.profiles.insert(tx.sender.clone(), profile.clone());
            }
            TxAction::GiveStar { to } => {
                let day_key = (tx.sender.clone(), tx.day());
                let given_today = ledger.given_per_day.get(&day_key).copied().unwrap_or(0);
                check_star_policy(&tx.sender, to, given_today)?;

                let today = tx.day();
                ledger.given_per_day.retain(|(_, day), _| *day >= today);
                *ledger.stars.entry(to.clone()).or_insert(0) += 1;
                *ledger.given_per_day.entry(day_key).or_insert(0) += 1;
            }
        }

        let receipt = TxReceipt::finalized();
        if let Some(key) = replay_key {
            ledger
                .receipts
                .insert(key, (receipt.tx_hash.clone(), tx.fingerprint()));
        }
        Ok(receipt)
    }
}
