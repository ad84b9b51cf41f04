//! Torx Dashboard
//!
//! Read-only web viewer over stored extraction results. Lists projects by
//! recency, renders the five document sections of one project, and offers
//! a refresh action that reopens storage.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod render;
pub mod store;
pub mod view;

use config::DashboardConfig;
use handlers::{create_router, AppState};
use store::StoreHandle;
use tokio::net::TcpListener;
use tracing::info;

/// Dashboard error
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the dashboard HTTP server
pub async fn start_server(config: DashboardConfig) -> Result<(), DashboardError> {
    let store = StoreHandle::new(config.storage.clone());
    info!("Starting Torx dashboard");
    info!("Storage: {}", store.describe());

    let app = create_router(AppState::new(store));

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Dashboard listening on http://{}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| DashboardError::Server(e.to_string()))?;

    Ok(())
}
