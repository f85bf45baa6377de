//! services/portal/src/bin/portal.rs

use portal_lib::{
    adapters::{FileSessionStorage, HttpBackend},
    config::Config,
    error::PortalError,
    web::{self, state::AppState},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), PortalError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting portal...");

    // --- 2. Initialize Adapters ---
    let backend = Arc::new(HttpBackend::new(config.api_base())?);
    info!("Using document analysis backend at {}", config.api_base());
    let storage = Arc::new(FileSessionStorage::new(config.session_path.clone()));
    info!("Session file: {}", storage.path().display());

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(config.clone(), backend, storage));

    // The guard shows a loading page until the persisted session has been read.
    let session = app_state.session.clone();
    tokio::spawn(async move {
        session.initialize().await;
    });

    // --- 4. Create the Web Router ---
    let app = web::router(app_state);

    // --- 5. Start the Server ---
    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            return;
        }
        info!("Shutdown requested");
        signal.cancel();
    });

    info!("Portal available at http://{}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("Portal stopped");
    Ok(())
}
