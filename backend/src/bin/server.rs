//! SeeLACK HTTP Server Binary
//!
//! Loads configuration, prepares the in-memory store and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin seelack-server
//!
//! # Explicit configuration file
//! SEELACK_CONFIG=/etc/seelack.toml cargo run --bin seelack-server
//! ```
//!
//! # Environment Variables
//!
//! - `SEELACK_CONFIG`: Configuration file path (default: search for `seelack.toml`)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log filter (default: the `[logging] level` setting)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use seelack::config::AppConfig;
use seelack::db::repositories::LocalRepository;
use seelack::db::repository::FullRepository;
use seelack::db::MockSeed;
use seelack::http::{create_router_with_origins, AppState};
use seelack::models::time::now_in;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting SeeLACK HTTP Server");

    let aggregation = config.aggregation_config()?;
    let repository = if config.store.seed_on_start {
        LocalRepository::with_seed(MockSeed::default_dataset(now_in(aggregation.offset)))
    } else {
        LocalRepository::new()
    };
    info!(
        "Store ready: {} users, {} channels, {} events",
        repository.user_count(),
        repository.channel_count(),
        repository.event_count()
    );

    let state = AppState::new(Arc::new(repository) as Arc<dyn FullRepository>)
        .with_aggregation(aggregation);
    let app = create_router_with_origins(state, &config.server.cors_origins);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!(
        "Reporting offset {}, match policy {:?}",
        aggregation.offset, aggregation.match_policy
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
