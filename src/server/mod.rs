//! Web server module
//!
//! Serves the four views (Home, Predict, Info, Tentang Data) as
//! server-rendered HTML plus a small JSON API over the same trained
//! pipeline. Training happens once, before the listener binds.

mod api;
mod error;
mod handlers;
pub mod pages;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use handlers::PredictForm;
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Spreadsheet the model is trained on
    pub data_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8501),
            data_path: std::env::var("STUNTING_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/stunting.xlsx")),
        }
    }
}

/// Load the dataset, train, then serve until ctrl+c
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(
        data_path = %config.data_path.display(),
        started_at = %start_time.to_rfc3339(),
        "Preparing model"
    );

    let bootstrap_config = config.clone();
    let state = tokio::task::spawn_blocking(move || AppState::bootstrap(bootstrap_config)).await??;
    info!(
        model = state.pipeline.selected().name(),
        rows = state.dataset.len(),
        "Model ready"
    );

    let state = Arc::new(state);
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening");
    info!(url = %format!("http://{}", addr), "Web UI available");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        if std::env::var("API_PORT").is_err() {
            assert_eq!(config.port, 8501);
        }
        if std::env::var("STUNTING_DATA_PATH").is_err() {
            assert_eq!(config.data_path, PathBuf::from("data/stunting.xlsx"));
        }
    }
}
