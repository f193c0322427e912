use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};

use super::{api_error, ApiResult, AppState};
use crate::{
    constants::{DEFAULT_TOP_USERS_LIMIT, MAX_TOP_USERS_LIMIT},
    models::{ranking::rank_users, RankedUser},
    services::ChainDataService,
};

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub users: Vec<RankedUser>,
}

pub async fn get_ranking(
    Query(params): Query<RankingQuery>,
    State((store, _config)): State<AppState>,
) -> ApiResult<RankingResponse> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_TOP_USERS_LIMIT)
        .min(MAX_TOP_USERS_LIMIT);

    let entries = ChainDataService::read_only(store)
        .get_top_users(limit)
        .await
        .map_err(api_error)?;

    Ok(Json(RankingResponse {
        users: rank_users(entries),
    }))
}
