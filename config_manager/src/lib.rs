use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] ConfigError),
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Helius API configuration
    pub helius: HeliusConfig,

    /// Mint tracking configuration (wallet, filters, cache window)
    pub tracker: TrackerConfig,

    /// API server configuration
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeliusConfig {
    /// Helius API key, appended to every upstream request as a query parameter
    pub api_key: String,

    /// Helius API base URL
    pub api_base_url: String,

    /// Request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Maximum attempts per upstream call (initial attempt included)
    pub max_retry_attempts: u32,

    /// Base backoff delay in milliseconds; doubled on each 429 retry
    pub base_retry_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Wallet whose transaction history is scanned for mint events
    pub wallet_address: String,

    /// SPL token program id used to recognize initializeMint2 instructions
    pub token_program_id: String,

    /// Maximum number of mint records kept in the cache
    pub max_mints: usize,

    /// Cache refresh window in seconds
    pub cache_refresh_seconds: u64,

    /// Fixed delay between processed transactions in milliseconds.
    /// Separate from the retry backoff delay; both are kept.
    pub throttle_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API server host
    pub host: String,

    /// API server port
    pub port: u16,

    /// Directory served as static assets (index page)
    pub static_dir: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            helius: HeliusConfig {
                api_key: "".to_string(), // Must be set in .env or config file
                api_base_url: "https://api.helius.xyz".to_string(),
                request_timeout_seconds: 30,
                max_retry_attempts: 7,
                base_retry_delay_ms: 1000,
            },
            tracker: TrackerConfig {
                wallet_address: "BAGSB9TpGrZxQbEsrEznv5jXXdwyP6AXerN8aVRiAmcv".to_string(),
                token_program_id: "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".to_string(),
                max_mints: 100,
                cache_refresh_seconds: 300, // 5 minutes
                throttle_ms: 1000,
            },
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                static_dir: "public".to_string(),
            },
        }
    }
}

impl HeliusConfig {
    /// Validate Helius configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "Helius API key is required".to_string(),
            ));
        }

        if self.request_timeout_seconds == 0 {
            return Err(ConfigurationError::InvalidValue(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_retry_attempts == 0 {
            return Err(ConfigurationError::InvalidValue(
                "Max retry attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl TrackerConfig {
    /// Validate tracker configuration
    pub fn validate(&self) -> Result<()> {
        if self.wallet_address.is_empty() {
            return Err(ConfigurationError::InvalidValue(
                "Wallet address is required".to_string(),
            ));
        }

        // Basic Solana address validation (base58, 32-44 characters)
        if self.wallet_address.len() < 32 || self.wallet_address.len() > 44 {
            return Err(ConfigurationError::InvalidValue(format!(
                "Invalid wallet address length: {}",
                self.wallet_address.len()
            )));
        }

        if self.max_mints == 0 {
            return Err(ConfigurationError::InvalidValue(
                "max_mints must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl SystemConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let mut config_builder = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&SystemConfig::default())?);

        // Add config file if it exists
        if config_path.as_ref().exists() {
            info!(
                "Loading configuration from: {}",
                config_path.as_ref().display()
            );
            config_builder = config_builder.add_source(File::from(config_path.as_ref()));
        } else {
            debug!("Config file not found, using defaults and environment variables");
        }

        // Add environment variables with prefix, e.g. MINT__HELIUS__API_KEY
        config_builder = config_builder.add_source(
            Environment::with_prefix("MINT")
                .try_parsing(true)
                .separator("__"),
        );

        let config = config_builder.build()?;
        let system_config: SystemConfig = config.try_deserialize()?;

        system_config.validate()?;

        Ok(system_config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.helius.validate()?;
        self.tracker.validate()?;

        if self.api.port == 0 {
            return Err(ConfigurationError::InvalidValue(
                "API port cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}
