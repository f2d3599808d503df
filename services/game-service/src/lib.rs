//! Game catalog service.
//!
//! Lists, filters, sorts and reports on video games and their developers.
//! Listing criteria are translated by [`query`] into a storage-agnostic
//! [`query::GameQuery`] that either [`db::PgGameStore`] or
//! [`memory::MemoryStore`] executes. The HTTP surface lives in [`routes`].

use std::sync::Arc;

use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod query;
pub mod report;
pub mod routes;
pub mod seed;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

use crate::config::Config;
use crate::db::{PgGameStore, create_pool};
use crate::memory::MemoryStore;
use crate::routes::create_routes;
use crate::service::GameService;
use crate::store::GameStore;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connects to PostgreSQL when configured, otherwise starts empty in memory.
pub async fn build_service(config: &Config) -> Result<GameService, sqlx::Error> {
    let store: Arc<dyn GameStore> = match &config.database_url {
        Some(url) => {
            info!("Connecting to PostgreSQL...");
            Arc::new(PgGameStore::new(create_pool(config, url).await?))
        }
        None => Arc::new(MemoryStore::new()),
    };

    Ok(GameService::new(store))
}

pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let service = build_service(&config).await?;
    let app = create_routes(service);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("HTTP API server listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!(error = %e, "failed to listen for Ctrl+C");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!(error = %e, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
