// Schedulink API server
// Decision: DATABASE_URL selects PostgreSQL; without it the server runs in-memory (dev mode)

use anyhow::{Context, Result};
use schedulink_control_plane::app::build_app;
use schedulink_control_plane::config::ServerConfig;
use schedulink_control_plane::services::Services;
use schedulink_control_plane::storage::StorageBackend;
use schedulink_core::BroadcastHub;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "schedulink_control_plane=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("schedulink-control-plane starting...");

    let config = ServerConfig::from_env().context("Invalid configuration")?;

    let backend = match &config.database_url {
        Some(url) => {
            let backend = StorageBackend::postgres(url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to database");
            backend
        }
        None => {
            tracing::warn!("DATABASE_URL not set, running with in-memory storage (dev mode)");
            StorageBackend::in_memory()
        }
    };

    let seeded = backend.seed_venues(&config.seed_venues).await;
    if !seeded.is_empty() {
        tracing::info!(count = seeded.len(), "Seeded venues");
    }

    let hub = BroadcastHub::new(config.broadcast_capacity);
    let services = Services::new(backend.stores(Arc::new(hub.clone())));

    if !config.api_prefix.is_empty() {
        tracing::info!(prefix = %config.api_prefix, "API prefix configured");
    }
    if config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
    }

    let app = build_app(&services, hub, backend.mode(), &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    tracing::info!("HTTP server listening on {}", config.bind_address);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
