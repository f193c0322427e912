use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::models::{InvalidAddress, ProfileField};

/// Field-keyed validation messages, shown next to the offending form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn add_field(&mut self, field: ProfileField, message: impl Into<String>) {
        self.add(field.as_str(), message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        f.write_str(&parts.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no wallet provider available")]
    NotAvailable,
    #[error("user rejected the wallet request")]
    UserRejected,
    #[error("wallet not connected")]
    NotConnected,
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("cannot give a star to yourself")]
    SelfStarNotAllowed,
    #[error("network error: {0}")]
    Network(String),
    #[error("transaction failed: {0}")]
    TransactionFailed(String),
}

impl ServiceError {
    /// Stable identifier used in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::NotAvailable => "not_available",
            ServiceError::UserRejected => "user_rejected",
            ServiceError::NotConnected => "not_connected",
            ServiceError::Validation(_) => "validation_error",
            ServiceError::SelfStarNotAllowed => "self_star_not_allowed",
            ServiceError::Network(_) => "network_error",
            ServiceError::TransactionFailed(_) => "transaction_failed",
        }
    }

    /// Whether retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::Network(_) | ServiceError::NotAvailable)
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Network(e.to_string())
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl From<InvalidAddress> for ServiceError {
    fn from(e: InvalidAddress) -> Self {
        ServiceError::Validation(ValidationErrors::single("address", e.to_string()))
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_serialize_as_map() {
        let mut errors = ValidationErrors::new();
        errors.add_field(ProfileField::Name, "Name is required");
        errors.add_field(ProfileField::Github, "Invalid GitHub URL");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["name"], "Name is required");
        assert_eq!(json["github"], "Invalid GitHub URL");
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["github", "name"]);
    }

    #[test]
    fn test_kinds_and_retryability() {
        assert_eq!(ServiceError::NotConnected.kind(), "not_connected");
        assert!(ServiceError::Network("timeout".into()).is_retryable());
        assert!(!ServiceError::SelfStarNotAllowed.is_retryable());
        assert!(!ServiceError::TransactionFailed("reverted".into()).is_retryable());
    }
}
