use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::{
    constants::{WALLET_ADDRESS_HEADER, WALLET_SIGNATURE_HEADER},
    errors::{ServiceError, ServiceResult},
    models::{Address, SignedTransaction, Transaction},
};

/// Wallet capability injected into the chain data service. Key management
/// and signature schemes live behind this trait.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Ask the wallet for its address. May prompt the user.
    async fn connect(&self) -> ServiceResult<Address>;

    /// Have the wallet approve and sign a transaction.
    async fn sign(&self, tx: Transaction) -> ServiceResult<SignedTransaction>;
}

/// Wallet identity carried on an HTTP request.
///
/// The browser wallet has already authorized the user; the address arrives in
/// `x-wallet-address` and an opaque signature in `x-wallet-signature`.
/// A write without a signature is refused. Verifying the signature itself is
/// the wallet SDK's concern.
#[derive(Debug, Clone, Default)]
pub struct HeaderIdentity {
    address: Option<String>,
    signature: Option<String>,
}

impl HeaderIdentity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        Self {
            address: read(WALLET_ADDRESS_HEADER),
            signature: read(WALLET_SIGNATURE_HEADER),
        }
    }

    /// Whether the request named a wallet at all.
    pub fn has_wallet(&self) -> bool {
        self.address.is_some()
    }
}

#[async_trait]
impl IdentityProvider for HeaderIdentity {
    async fn connect(&self) -> ServiceResult<Address> {
        let raw = self.address.as_deref().ok_or(ServiceError::NotAvailable)?;
        Address::parse(raw).map_err(|e| {
            tracing::warn!("Rejecting wallet header: {}", e);
            ServiceError::NotAvailable
        })
    }

    async fn sign(&self, tx: Transaction) -> ServiceResult<SignedTransaction> {
        let Some(signature) = self.signature.clone() else {
            tracing::warn!("Unsigned write from {} refused", tx.sender);
            return Err(ServiceError::UserRejected);
        };
        Ok(SignedTransaction { tx, signature })
    }
}

/// Provider for read-only service instances: there is no wallet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWallet;

#[async_trait]
impl IdentityProvider for NoWallet {
    async fn connect(&self) -> ServiceResult<Address> {
        Err(ServiceError::NotAvailable)
    }

    async fn sign(&self, _tx: Transaction) -> ServiceResult<SignedTransaction> {
        Err(ServiceError::NotAvailable)
    }
}

#[derive(Debug, Clone)]
enum WalletBehavior {
    Approve(Address),
    Absent,
    Reject,
    Offline,
    RejectSigning(Address),
}

/// Scriptable wallet for tests, demos and tooling.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    behavior: WalletBehavior,
}

impl StaticIdentity {
    /// Connects as `address` and signs everything.
    pub fn approving(address: Address) -> Self {
        Self {
            behavior: WalletBehavior::Approve(address),
        }
    }

    /// No wallet installed.
    pub fn absent() -> Self {
        Self {
            behavior: WalletBehavior::Absent,
        }
    }

    /// User declines the connection prompt.
    pub fn rejecting() -> Self {
        Self {
            behavior: WalletBehavior::Reject,
        }
    }

    /// Wallet cannot reach its network.
    pub fn offline() -> Self {
        Self {
            behavior: WalletBehavior::Offline,
        }
    }

    /// Connects as `address` but the user declines every signature.
    pub fn rejecting_signatures(address: Address) -> Self {
        Self {
            behavior: WalletBehavior::RejectSigning(address),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn connect(&self) -> ServiceResult<Address> {
        match &self.behavior {
            WalletBehavior::Approve(address) | WalletBehavior::RejectSigning(address) => {
                Ok(address.clone())
            }
            WalletBehavior::Absent => Err(ServiceError::NotAvailable),
            WalletBehavior::Reject => Err(ServiceError::UserRejected),
            WalletBehavior::Offline => {
                Err(ServiceError::Network("wallet provider unreachable".to_string()))
            }
        }
    }

    async fn sign(&self, tx: Transaction) -> ServiceResult<SignedTransaction> {
        match &self.behavior {
            WalletBehavior::Approve(_) => {
                let signature = format!("static:{}", hex::encode(tx.sender.as_str()));
                Ok(SignedTransaction { tx, signature })
            }
            WalletBehavior::RejectSigning(_) | WalletBehavior::Reject => {
                Err(ServiceError::UserRejected)
            }
            WalletBehavior::Absent => Err(ServiceError::NotAvailable),
            WalletBehavior::Offline => {
                Err(ServiceError::Network("wallet provider unreachable".to_string()))
            }
        }
    }
}
