pub mod health;
pub mod profile;
pub mod ranking;
pub mod session;
pub mod stars;

use axum::{
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Serialize;

use std::sync::Arc;

use crate::{
    db::SharedStore,
    errors::{ServiceError, ValidationErrors},
    models::ConnectionState,
    services::{ChainDataService, HeaderIdentity},
    utils::Config,
};

pub use health::health_check;
pub use profile::{get_profile, save_profile, validate_profile_form};
pub use ranking::get_ranking;
pub use session::connect_session;
pub use stars::{get_stars, give_star};

pub type AppState = (SharedStore, Config);

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ValidationErrors>,
    pub retryable: bool,
}

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Service and session for a write request. A request that names no wallet
/// gets a disconnected session, so the write fails as `NotConnected`.
pub(crate) async fn write_session(
    store: SharedStore,
    headers: &HeaderMap,
) -> Result<(ChainDataService, ConnectionState), (StatusCode, Json<ApiError>)> {
    let identity = HeaderIdentity::from_headers(headers);
    let has_wallet = identity.has_wallet();
    let service = ChainDataService::new(store, Arc::new(identity));

    let session = if has_wallet {
        service.connect().await.map_err(api_error)?
    } else {
        ConnectionState::Disconnected
    };
    Ok((service, session))
}

/// Map a service failure onto an HTTP status and JSON body.
pub fn api_error(e: ServiceError) -> (StatusCode, Json<ApiError>) {
    let status = match &e {
        ServiceError::NotAvailable | ServiceError::NotConnected => StatusCode::UNAUTHORIZED,
        ServiceError::UserRejected => StatusCode::FORBIDDEN,
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::SelfStarNotAllowed | ServiceError::TransactionFailed(_) => StatusCode::CONFLICT,
        ServiceError::Network(_) => StatusCode::BAD_GATEWAY,
    };

    let kind = e.kind();
    let retryable = e.is_retryable();

    let (error, fields) = match e {
        ServiceError::Validation(fields) => ("validation failed".to_string(), Some(fields)),
        ServiceError::Network(detail) => {
            // Store details stay in the logs.
            tracing::error!("Request failed against backing store: {}", detail);
            ("backing store unavailable".to_string(), None)
        }
        other => (other.to_string(), None),
    };

    (status, Json(ApiError { error, kind, fields, retryable }))
}
