//! HTTP server implementation

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use std::path::Path;
use tower::ServiceBuilder;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::models::HealthStatus;
use crate::config::ServerConfig;

/// Build the router: `/health` plus static files with index fallback
pub fn router(static_dir: &Path, index_file: &str) -> Router {
    let index = ServeFile::new(static_dir.join(index_file));
    let assets = ServeDir::new(static_dir).fallback(index);

    Router::new()
        .route("/health", get(health_handler))
        .fallback_service(assets)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Bind the configured port and serve until the process exits
pub async fn serve(config: &ServerConfig) -> Result<()> {
    if !config.static_dir.join(&config.index_file).exists() {
        warn!(
            "⚠️ Index document {} not found in {}",
            config.index_file,
            config.static_dir.display()
        );
    }

    let app = router(&config.static_dir, &config.index_file);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("🌐 Server is up on http://0.0.0.0:{}", config.port);
    info!("📁 Serving {}", config.static_dir.display());

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check handler
async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus::healthy())
}
