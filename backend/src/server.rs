use axum::{
    http::{HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    constants::{WALLET_ADDRESS_HEADER, WALLET_SIGNATURE_HEADER},
    db::SharedStore,
    handlers,
    utils::Config,
};

pub fn create_router(store: SharedStore, config: Config) -> Router {
    let cors_layer = create_cors_layer(&config);
    let app_state = (store, config);

    Router::new()
        .route("/api/health", get(handlers::health_check))
        // Wallet session
        .route("/api/session", post(handlers::connect_session))
        // Profiles
        .route("/api/profile", put(handlers::save_profile))
        .route("/api/profile/validate", post(handlers::validate_profile_form))
        .route("/api/profile/{address}", get(handlers::get_profile))
        // Stars and leaderboard
        .route("/api/stars", post(handlers::give_star))
        .route("/api/stars/{address}", get(handlers::get_stars))
        .route("/api/ranking", get(handlers::get_ranking))
        .layer(cors_layer)
        .with_state(app_state)
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            HeaderName::from_static(WALLET_ADDRESS_HEADER),
            HeaderName::from_static(WALLET_SIGNATURE_HEADER),
        ])
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .flatten()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        // Default to permissive for development
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}
