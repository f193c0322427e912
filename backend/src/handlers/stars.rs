use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{api_error, write_session, ApiResult, AppState};
use crate::{models::Address, services::ChainDataService};

#[derive(Debug, Deserialize)]
pub struct GiveStarRequest {
    pub to_address: String,
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GiveStarResponse {
    pub success: bool,
    pub tx_hash: String,
    pub replayed: bool,
}

#[derive(Debug, Serialize)]
pub struct StarsResponse {
    pub address: Address,
    pub stars: u64,
}

pub async fn get_stars(
    Path(address): Path<String>,
    State((store, _config)): State<AppState>,
) -> ApiResult<StarsResponse> {
    let address = Address::parse(&address).map_err(|e| api_error(e.into()))?;
    let stars = ChainDataService::read_only(store)
        .get_stars(&address)
        .await
        .map_err(api_error)?;

    Ok(Json(StarsResponse { address, stars }))
}

pub async fn give_star(
    headers: HeaderMap,
    State((store, _config)): State<AppState>,
    Json(req): Json<GiveStarRequest>,
) -> ApiResult<GiveStarResponse> {
    let (service, session) = write_session(store, &headers).await?;
    let receipt = service
        .give_star_to(&session, &req.to_address, req.idempotency_key)
        .await
        .map_err(api_error)?;

    Ok(Json(GiveStarResponse {
        success: true,
        tx_hash: receipt.tx_hash,
        replayed: receipt.replayed,
    }))
}
