use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Json,
};
use serde::Serialize;

use super::{api_error, write_session, ApiResult, AppState};
use crate::{
    errors::ValidationErrors,
    models::{Address, Profile},
    services::ChainDataService,
    utils::validate_profile,
};

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub address: Address,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub success: bool,
    pub tx_hash: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateProfileResponse {
    pub valid: bool,
    pub errors: ValidationErrors,
}

pub async fn get_profile(
    Path(address): Path<String>,
    State((store, _config)): State<AppState>,
) -> ApiResult<ProfileResponse> {
    let address = Address::parse(&address).map_err(|e| api_error(e.into()))?;
    let profile = ChainDataService::read_only(store)
        .get_profile(&address)
        .await
        .map_err(api_error)?;

    Ok(Json(ProfileResponse { address, profile }))
}

/// Save the profile of the wallet in the request headers.
pub async fn save_profile(
    headers: HeaderMap,
    State((store, _config)): State<AppState>,
    Json(profile): Json<Profile>,
) -> ApiResult<SaveProfileResponse> {
    let (service, session) = write_session(store, &headers).await?;
    let receipt = service.save_profile(&session, profile).await.map_err(api_error)?;

    Ok(Json(SaveProfileResponse {
        success: true,
        tx_hash: receipt.tx_hash,
    }))
}

/// Advisory check used by the profile form before submitting.
pub async fn validate_profile_form(Json(profile): Json<Profile>) -> Json<ValidateProfileResponse> {
    let errors = validate_profile(&profile).err().unwrap_or_default();
    Json(ValidateProfileResponse {
        valid: errors.is_empty(),
        errors,
    })
}
