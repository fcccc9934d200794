//! Tallyup API Server
//!
//! Main entry point for the Tallyup settlement service.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tallyup_api::{AppState, create_router};
use tallyup_core::currency::RateTable;
use tallyup_core::settlement::{SettlementCache, SettlementPolicy, SettlementService};
use tallyup_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tallyup=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    let rates = RateTable::from_config(&config.currency).context("Invalid currency rates")?;
    let policy =
        SettlementPolicy::from_config(&config.settlement).context("Invalid settlement policy")?;
    info!(
        reference = %rates.reference(),
        currencies = rates.iter().count(),
        tolerance = %policy.tolerance(),
        "Settlement service configured"
    );

    let cache = SettlementCache::from_config(&config.cache);
    info!(
        max_capacity = config.cache.max_capacity,
        ttl_secs = config.cache.ttl_secs,
        "Report cache configured"
    );

    // Create application state
    let state = AppState::new(SettlementService::new(rates, policy), cache);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
