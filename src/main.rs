//! Stunting Predictor - web app entry point

use stunting_predictor::server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stunting_predictor=info,tower_http=info".into()),
        )
        .init();

    run_server(ServerConfig::default()).await
}
