//! Log viewer API server.
//!
//! Serves `GET /api/logs?lines=N` from the first log source that has lines.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use lv_api::config::ApiConfig;
use lv_api::routes;
use lv_api::state::AppState;
use lv_log_tools::ViewerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "lv-api starting");

    let config = ApiConfig::from_env()?;

    let viewer = match &config.config_path {
        Some(path) => {
            tracing::info!(path = %path, "loading retrieval config");
            ViewerConfig::from_file(path)
                .with_context(|| format!("failed to load config from {path}"))?
        }
        None => {
            tracing::warn!("LV_CONFIG not set, using built-in defaults");
            let viewer = ViewerConfig::default();
            viewer.validate()?;
            viewer
        }
    };
    tracing::info!(runtime = ?viewer.runtime, "retrieval configured");

    let app = routes::build_router(AppState::from_config(viewer));

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
