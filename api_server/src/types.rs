use helius_client::MintRecord;
use serde::{Deserialize, Serialize};

/// Standard API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response for `GET /cache`
#[derive(Debug, Serialize)]
pub struct MintsResponse {
    pub mints: Vec<MintRecord>,
    #[serde(rename = "fromCache")]
    pub from_cache: bool,
}

/// Query parameters for `GET /proxy/helius`
#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub path: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub cached_mints: usize,
    pub last_refresh: Option<chrono::DateTime<chrono::Utc>>,
}
