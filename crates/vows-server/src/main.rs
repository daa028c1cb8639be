//! Vows Server: Application entry point.

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vows_core::events::PlannerEventBus;
use vows_db::DbManager;
use vows_server::{AppState, ServerConfig, routes};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vows=info")),
        )
        .json()
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "Vows server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting Vows server...");

    let config = ServerConfig::load()?;
    let db = DbManager::connect(&config.db_config()).await?;
    let events = PlannerEventBus::new(config.event_capacity);
    let state = AppState::new(
        db.client().clone(),
        config.auth_config()?,
        events,
        config.public_base_url.clone(),
    );

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;

    info!("Vows server stopped.");
    Ok(())
}
