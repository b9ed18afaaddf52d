//! reviewd - local AI code-review daemon.

use anyhow::Result;
use reviewd::config::ReviewdConfig;
use reviewd::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("reviewd v{} starting", env!("CARGO_PKG_VERSION"));

    let config = ReviewdConfig::load();
    info!("Ollama URL: {}", config.ollama.url);
    info!("Default model: {}", config.ollama.default_model);

    server::run(config).await
}
