use axum::{extract::State, http::HeaderMap, response::Json};
use std::sync::Arc;

use super::{api_error, ApiResult, AppState};
use crate::{
    models::ConnectionState,
    services::{ChainDataService, HeaderIdentity},
};

/// Connect the wallet named in the request headers.
pub async fn connect_session(
    headers: HeaderMap,
    State((store, _config)): State<AppState>,
) -> ApiResult<ConnectionState> {
    let service = ChainDataService::new(store, Arc::new(HeaderIdentity::from_headers(&headers)));
    let state = service.connect().await.map_err(api_error)?;
    Ok(Json(state))
}
