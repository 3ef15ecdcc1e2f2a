use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use helius_client::{HeliusClient, HeliusError};
use mint_collector::{CollectorError, MintCache, MintCollector};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir};

pub mod handlers;
pub mod types;

use handlers::*;
use types::ErrorResponse;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: config_manager::SystemConfig,
    pub helius: Arc<HeliusClient>,
    pub collector: Arc<MintCollector>,
    pub cache: Arc<MintCache>,
}

/// Main application error type
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("Helius error: {0}")]
    Helius(#[from] HeliusError),
    #[error("Collection error: {0}")]
    Collection(#[from] CollectorError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Helius(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            ApiError::Collection(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.api.static_dir.clone();

    Router::new()
        .route("/health", get(health_check))
        .route("/cache", get(get_cached_mints))
        .route("/proxy/helius", get(proxy_helius))
        // Static page: / falls through to index.html
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .into_inner(),
        )
        .with_state(state)
}
