use api_server::{create_router, AppState};
use config_manager::SystemConfig;
use helius_client::{HeliusClient, TransactionSource};
use mint_collector::{MintCache, MintCollector};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,api_server=debug".into()),
        )
        .init();

    info!("Starting Mint Tracker API Server...");

    // Load configuration
    let config = SystemConfig::load()?;
    info!("Configuration loaded successfully");

    // Initialize the Helius client and the collection pipeline
    let helius = Arc::new(HeliusClient::new(config.helius.clone())?);
    let source: Arc<dyn TransactionSource> = helius.clone();
    let collector = Arc::new(MintCollector::new(source, &config.tracker));
    let cache = Arc::new(MintCache::new(config.tracker.cache_refresh_seconds));
    info!(
        "Tracking mints for wallet {} (max {}, refresh window {}s)",
        config.tracker.wallet_address, config.tracker.max_mints, config.tracker.cache_refresh_seconds
    );

    let app_state = AppState {
        config: config.clone(),
        helius,
        collector,
        cache,
    };

    let app = create_router(app_state);

    info!("📋 Available endpoints:");
    info!("   • GET /cache - cached token mints for the tracked wallet");
    info!("   • GET /proxy/helius?path=<path> - Helius API passthrough");
    info!("   • GET /health - health check");
    info!("   • GET / - static mint table page");

    // Bind and serve
    let bind_addr = format!("{}:{}", config.api.host, config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
