//! Geo query HTTP server
//!
//! Exposes read-only SQL execution and GeoJSON heatmap generation over a
//! SQLite database:
//!
//! - `POST /execute_sql` runs a classified raw query
//! - `GET /get_columns_table` and `GET /get_filters` run fixed templates
//! - `POST /generate_heatmap_byfilter` filters template rows into points
//! - `POST /convert` turns client records into points
//!
//! Every failure answers `400 {"error": "..."}`.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use state::AppState;
pub use telemetry::init_logging;

use axum::Router;
use gq_data::DataError;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Geo query HTTP server
pub struct GeoQueryServer {
    state: Arc<AppState>,
    router: Router,
}

impl GeoQueryServer {
    /// Create a new server with the given configuration
    pub async fn new(config: ServerConfig) -> std::result::Result<Self, DataError> {
        let state = Arc::new(AppState::new(config).await?);
        let router = routes::build_router(state.clone());
        Ok(Self { state, router })
    }

    /// Get a reference to the application state
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Get the router for testing
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until ctrl-c
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let addr = self.state.config.listen_addr;
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received");
}
