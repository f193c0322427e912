use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Address, Profile};
use crate::constants::SECONDS_PER_DAY;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TxAction {
    SaveProfile { profile: Profile },
    GiveStar { to: Address },
}

/// A write submitted on behalf of `sender`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: Address,
    pub action: TxAction,
    pub submitted_at: DateTime<Utc>,
    pub idempotency_key: Option<String>,
}

impl Transaction {
    pub fn save_profile(sender: Address, profile: Profile) -> Self {
        Self::new(sender, TxAction::SaveProfile { profile })
    }

    pub fn give_star(sender: Address, to: Address) -> Self {
        Self::new(sender, TxAction::GiveStar { to })
    }

    fn new(sender: Address, action: TxAction) -> Self {
        Self {
            sender,
            action,
            submitted_at: Utc::now(),
            idempotency_key: None,
        }
    }

    pub fn with_idempotency_key(mut self, key: Option<String>) -> Self {
        self.idempotency_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    pub fn submitted_at(mut self, at: DateTime<Utc>) -> Self {
        self.submitted_at = at;
        self
    }

    /// Stable description of what this transaction does, independent of
    /// when it was submitted. Two submissions sharing an idempotency key must
    /// have the same fingerprint.
    pub fn fingerprint(&self) -> String {
        match &self.action {
            TxAction::GiveStar { to } => format!("give_star:{}", to),
            TxAction::SaveProfile { profile } => format!(
                "save_profile:{}",
                [&profile.name, &profile.linkedin, &profile.github, &profile.twitter]
                    .iter()
                    .map(|field| hex::encode(field.as_bytes()))
                    .collect::<Vec<_>>()
                    .join(":")
            ),
        }
    }

    /// UTC day index used by the daily star limit.
    pub fn day(&self) -> i64 {
        self.submitted_at.timestamp().div_euclid(SECONDS_PER_DAY)
    }
}

/// A transaction approved by the sender's wallet. The signature is opaque to
/// this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx: Transaction,
    pub signature: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    /// True when an earlier transaction with the same idempotency key was
    /// returned instead of applying this one.
    pub replayed: bool,
}

impl TxReceipt {
    pub fn finalized() -> Self {
        Self {
            tx_hash: new_tx_hash(),
            replayed: false,
        }
    }

    pub fn replay_of(tx_hash: String) -> Self {
        Self {
            tx_hash,
            replayed: true,
        }
    }
}

pub fn new_tx_hash() -> String {
    format!("0x{}", hex::encode(Uuid::new_v4().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn addr(raw: &str) -> Address {
        Address::parse(raw).unwrap()
    }

    #[test]
    fn test_tx_hash_format() {
        let hash = new_tx_hash();
        assert!(hash.starts_with("0x"));
        assert_eq!(hash.len(), 34);
        assert_ne!(hash, new_tx_hash());
    }

    #[test]
    fn test_day_boundaries() {
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 23, 59, 59).unwrap();
        let early = Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap();
        let a = Transaction::give_star(addr("a"), addr("b")).submitted_at(late);
        let b = Transaction::give_star(addr("a"), addr("b")).submitted_at(early);
        assert_eq!(a.day() + 1, b.day());
    }

    #[test]
    fn test_fingerprint_ignores_time_but_not_payload() {
        let now = Utc::now();
        let a = Transaction::give_star(addr("a"), addr("b")).submitted_at(now);
        let b = Transaction::give_star(addr("a"), addr("b"))
            .submitted_at(now + chrono::Duration::minutes(5));
        let c = Transaction::give_star(addr("a"), addr("c"));
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());

        let ana = Transaction::save_profile(addr("a"), Profile::new("Ana"));
        let ana_gh = Transaction::save_profile(addr("a"), Profile::new("Ana").with_github("https://github.com/ana"));
        assert_ne!(ana.fingerprint(), ana_gh.fingerprint());
        assert_ne!(ana.fingerprint(), a.fingerprint());
    }

    #[test]
    fn test_blank_idempotency_key_is_dropped() {
        let tx = Transaction::give_star(addr("a"), addr("b"))
            .with_idempotency_key(Some("  ".to_string()));
        assert_eq!(tx.idempotency_key, None);
    }
}
