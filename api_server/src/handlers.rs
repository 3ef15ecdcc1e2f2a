use crate::types::*;
use crate::{ApiError, AppState};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
};
use serde_json::Value;
use tracing::{info, warn};

/// Health check endpoint with a summary of the cache contents
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.cache.snapshot().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        cached_mints: snapshot.records.len(),
        last_refresh: snapshot.last_refresh,
    })
}

/// `GET /cache` - serve the derived mint list, refreshing it when stale
pub async fn get_cached_mints(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let (mints, from_cache) = state.cache.get(&state.collector).await.map_err(|e| {
        warn!("Error fetching mints: {}", e);
        e
    })?;

    info!(
        "Serving {} mints (from_cache: {})",
        mints.len(),
        from_cache
    );

    Ok(Json(MintsResponse { mints, from_cache }))
}

/// `GET /proxy/helius?path=...` - passthrough to the upstream API,
/// kept for the static page's direct lookups
pub async fn proxy_helius(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Json<Value>, ApiError> {
    let path = query
        .path
        .ok_or_else(|| ApiError::BadRequest("Missing path query parameter".to_string()))?;

    let body = state
        .helius
        .call(&path, "Helius proxy")
        .await
        .map_err(|e| {
            warn!("Proxy error: {}", e);
            e
        })?;

    Ok(Json(body))
}
