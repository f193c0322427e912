use async_trait::async_trait;
use sqlx::PgPool;

use super::store::{check_signer, check_star_policy, replay_previous, ChainStore};
use crate::{
    errors::ServiceResult,
    models::{Address, Profile, RankingEntry, SignedTransaction, TxAction, TxReceipt},
};

const GIVE_STAR: &str = "give_star";
const SAVE_PROFILE: &str = "save_profile";

/// Postgres-backed store. Each transaction runs inside one SQL transaction
/// holding an advisory lock on the sender, so limit checks and inserts for
/// one sender never interleave.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ChainStore for PgStore {
    async fn profile(&self, address: &Address) -> ServiceResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            "SELECT name, linkedin, github, twitter FROM profiles WHERE address = $1",
        )
        .bind(address.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn stars(&self, address: &Address) -> ServiceResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM transactions WHERE action = $1 AND recipient = $2",
        )
        .bind(GIVE_STAR)
        .bind(address.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn top_users(&self, limit: usize) -> ServiceResult<Vec<RankingEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT recipient, COUNT(*) AS stars
            FROM transactions
            WHERE action = $1 AND recipient IS NOT NULL
            GROUP BY recipient
            ORDER BY stars DESC, recipient ASC
            LIMIT $2
            "#,
        )
        .bind(GIVE_STAR)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .filter_map(|(recipient, stars)| match Address::parse(&recipient) {
                Ok(address) => Some(RankingEntry::new(address, stars.max(0) as u64)),
                Err(e) => {
                    tracing::warn!("Skipping malformed recipient in ranking: {}", e);
                    None
                }
            })
            .collect();

        Ok(entries)
    }

    async fn send(&self, signed: SignedTransaction) -> ServiceResult<TxReceipt> {
        check_signer(&signed)?;
        let tx = signed.tx;
        let mut db_tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(tx.sender.as_str())
            .execute(&mut *db_tx)
            .await?;

        if let Some(key) = &tx.idempotency_key {
            let previous = sqlx::query_as::<_, (String, String)>(
                "SELECT tx_hash, fingerprint FROM transactions WHERE sender = $1 AND idempotency_key = $2",
            )
            .bind(tx.sender.as_str())
            .bind(key)
            .fetch_optional(&mut *db_tx)
            .await?;

            if let Some((tx_hash, fingerprint)) = previous {
                db_tx.rollback().await?;
                return replay_previous(tx_hash, &fingerprint, &tx.fingerprint());
            }
        }

        let (action, recipient) = match &tx.action {
            TxAction::SaveProfile { profile } => {
                sqlx::query(
                    r#"
                    INSERT INTO profiles (address, name, linkedin, github, twitter)
                    VALUES ($1, $2, $3, $4, $5)
                    ON CONFLICT (address) DO UPDATE SET
                        name = EXCLUDED.name,
                        linkedin = EXCLUDED.linkedin,
                        github = EXCLUDED.github,
                        twitter = EXCLUDED.twitter,
                        updated_at = NOW()
                    "#,
                )
                .bind(tx.sender.as_str())
                .bind(&profile.name)
                .bind(&profile.linkedin)
                .bind(&profile.github)
                .bind(&profile.twitter)
                .execute(&mut *db_tx)
                .await?;

                (SAVE_PROFILE, None)
            }
            TxAction::GiveStar { to } => {
                let given_today = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM transactions WHERE action = $1 AND sender = $2 AND day = $3",
                )
                .bind(GIVE_STAR)
                .bind(tx.sender.as_str())
                .bind(tx.day())
                .fetch_one(&mut *db_tx)
                .await?;

                check_star_policy(&tx.sender, to, given_today.max(0) as u64)?;
                (GIVE_STAR, Some(to.as_str()))
            }
        };

        let receipt = TxReceipt::finalized();
        sqlx::query(
            r#"
            INSERT INTO transactions
                (tx_hash, sender, action, recipient, day, idempotency_key, fingerprint, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&receipt.tx_hash)
        .bind(tx.sender.as_str())
        .bind(action)
        .bind(recipient)
        .bind(tx.day())
        .bind(tx.idempotency_key.as_deref())
        .bind(tx.fingerprint())
        .bind(tx.submitted_at)
        .execute(&mut *db_tx)
        .await?;

        db_tx.commit().await?;
        Ok(receipt)
    }
}
