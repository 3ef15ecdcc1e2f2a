use crate::types::HeliusTransaction;
use async_trait::async_trait;
use config_manager::HeliusConfig;
use reqwest::Client;
use retry_utils::{retry_with_backoff, ErrorClass, RetriesExhausted, RetryPolicy};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum HeliusError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsingFailed(#[from] serde_json::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("rate limit exceeded (HTTP 429)")]
    RateLimitExceeded,
    #[error("{label} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        label: String,
        attempts: u32,
        #[source]
        source: Box<HeliusError>,
    },
    #[error("Invalid wallet address: {0}")]
    InvalidWalletAddress(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<RetriesExhausted<HeliusError>> for HeliusError {
    fn from(err: RetriesExhausted<HeliusError>) -> Self {
        HeliusError::RetriesExhausted {
            label: err.label,
            attempts: err.attempts,
            source: Box::new(err.source),
        }
    }
}

pub type Result<T> = std::result::Result<T, HeliusError>;

/// Source of paginated wallet transaction history. The collector depends on
/// this seam instead of the concrete client so the paginator can be mocked.
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch one page of transactions, older than `before` when given
    async fn transactions_page(
        &self,
        wallet_address: &str,
        before: Option<&str>,
    ) -> Result<Vec<HeliusTransaction>>;
}

/// Rate-limited Helius API client with bounded retries.
///
/// Each call is attempted up to `max_retry_attempts` times: HTTP 429 backs
/// off exponentially from `base_retry_delay_ms`, any other failure retries
/// immediately, and exhaustion surfaces a composed error carrying the call
/// label and the attempt count.
#[derive(Debug, Clone)]
pub struct HeliusClient {
    http_client: Client,
    config: HeliusConfig,
    policy: RetryPolicy,
}

impl HeliusClient {
    /// Create a new Helius client with the given configuration
    pub fn new(config: HeliusConfig) -> Result<Self> {
        if config.api_key.is_empty() {
            return Err(HeliusError::ConfigError(
                "Helius API key is required".to_string(),
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent("mint-tracker/1.0")
            .build()
            .map_err(|e| HeliusError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        let policy = RetryPolicy::new(
            config.max_retry_attempts,
            Duration::from_millis(config.base_retry_delay_ms),
        );

        Ok(Self {
            http_client,
            config,
            policy,
        })
    }

    /// Build the upstream URL, merging the api-key query parameter with `?`
    /// or `&` depending on whether the path already carries a query string
    fn build_url(&self, path: &str) -> String {
        let separator = if path.contains('?') { "&" } else { "?" };
        format!(
            "{}{}{}api-key={}",
            self.config.api_base_url, path, separator, self.config.api_key
        )
    }

    /// Single GET attempt: 2xx parses the JSON body, 429 maps to
    /// `RateLimitExceeded`, anything else to `ApiError`
    async fn attempt_get(&self, url: &str) -> Result<serde_json::Value> {
        let response = self.http_client.get(url).send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.json::<serde_json::Value>().await?;
            return Ok(body);
        }

        if status.as_u16() == 429 {
            return Err(HeliusError::RateLimitExceeded);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(HeliusError::ApiError {
            status: status.as_u16(),
            message,
        })
    }

    /// Make a retrying GET request to the Helius API and return the parsed
    /// JSON body. `label` names the call in logs and composed errors.
    pub async fn call(&self, path: &str, label: &str) -> Result<serde_json::Value> {
        let url = self.build_url(path);
        debug!("Making Helius API request ({}): {}", label, path);

        let result = retry_with_backoff(
            self.policy,
            label,
            |_attempt| self.attempt_get(&url),
            |e| match e {
                HeliusError::RateLimitExceeded => ErrorClass::RateLimited,
                _ => ErrorClass::Upstream,
            },
        )
        .await?;

        Ok(result)
    }

    /// Validate wallet address format (base58, 32-44 characters)
    fn validate_wallet_address(&self, wallet_address: &str) -> Result<()> {
        if wallet_address.is_empty() {
            return Err(HeliusError::InvalidWalletAddress(
                "Wallet address cannot be empty".to_string(),
            ));
        }

        if wallet_address.len() < 32 || wallet_address.len() > 44 {
            return Err(HeliusError::InvalidWalletAddress(format!(
                "Invalid wallet address length: {}",
                wallet_address.len()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl TransactionSource for HeliusClient {
    async fn transactions_page(
        &self,
        wallet_address: &str,
        before: Option<&str>,
    ) -> Result<Vec<HeliusTransaction>> {
        self.validate_wallet_address(wallet_address)?;

        let mut path = format!("/v0/addresses/{}/transactions", wallet_address);
        if let Some(before_signature) = before {
            path.push_str(&format!("?before={}", before_signature));
        }

        let body = self.call(&path, "Wallet Transactions").await?;
        let transactions: Vec<HeliusTransaction> = serde_json::from_value(body).map_err(|e| {
            error!("Failed to parse Helius transactions response: {}", e);
            HeliusError::JsonParsingFailed(e)
        })?;

        debug!(
            "Fetched {} transactions for wallet {} (before: {:?})",
            transactions.len(),
            wallet_address,
            before
        );

        Ok(transactions)
    }
}
