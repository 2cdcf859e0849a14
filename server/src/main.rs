//! Motora Server - Main Entry Point

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use mb_server::{api, catalog, config, db, recovery, subscribers};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mb_server=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Motora Server"
    );

    // Operation catalog and store
    let catalog = Arc::new(catalog::OperationCatalog::with_builtins());
    info!(operations = catalog.len(), "Operation catalog loaded");

    let database = db::Database::new();

    // Application state wires the gate and the dispatcher over the catalog
    let state = api::AppState::new(database.clone(), config.clone(), catalog);

    // Default subscribers: audit trail + invoicing
    subscribers::register_default_subscribers(&state.dispatcher, database.clone()).await?;

    // Bootstrap admin so the admin surface is reachable on a fresh store
    let admin = database.create_user(
        &config.bootstrap_admin_username,
        mb_common::Role::Admin,
        vec![],
    );
    info!(user_id = %admin.id, username = %admin.username, "Bootstrap admin ready");

    // Periodic recovery sweep
    let _recovery_task = recovery::spawn_recovery_task(
        database,
        Arc::clone(&state.dispatcher),
        config.recovery_interval_secs,
        config.recovery_grace_secs,
    );

    // Build router
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!(address = %config.bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shutdown complete");

    Ok(())
}
