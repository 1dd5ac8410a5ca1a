use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod domain;
mod event_sourcing;
mod metrics;
mod utils;

use api::AppState;
use config::AppConfig;
use utils::RetryConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging with environment-based filtering
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pool_market=debug")),
        )
        .init();

    tracing::info!("starting pool-market group order service");

    let config = AppConfig::load();

    // === 1. Metrics registry + scrape server on its own port ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!(
        "metrics registry created with {} metrics",
        metrics.registry().gather().len()
    );

    let registry = Arc::new(metrics.registry().clone());
    let metrics_port = config.metrics_port;
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("metrics runtime");
        rt.block_on(async {
            if let Err(e) = metrics::start_metrics_server(registry, metrics_port).await {
                tracing::error!("metrics server error: {}", e);
            }
        });
    });

    // === 2. Wire the store, catalog and command handler ===
    let state = AppState::new(config.order_policy(), RetryConfig::default(), metrics);

    // === 3. Serve the REST API ===
    api::start_api_server(state, &config.bind_addr, config.port).await?;

    Ok(())
}
