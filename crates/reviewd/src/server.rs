//! HTTP server for reviewd.

use crate::config::ReviewdConfig;
use crate::orchestrator::{LlmBackend, OllamaBackend, ReviewOrchestrator};
use crate::routes;
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, Router};
use review_common::ollama::OllamaClient;
use review_common::store::{
    CommitStore, InMemoryCommitStore, InMemorySubscriptionStore, SubscriptionStore,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers.
///
/// Stores are trait objects so composition can swap in database-backed
/// implementations without touching any handler.
pub struct AppState {
    pub orchestrator: ReviewOrchestrator,
    pub commits: Arc<dyn CommitStore>,
    pub subscriptions: Arc<dyn SubscriptionStore>,
}

impl AppState {
    /// Production wiring: Ollama backend, in-memory stores.
    pub fn new(config: &ReviewdConfig) -> Self {
        let client = OllamaClient::new(&config.ollama.url)
            .with_generate_timeout(config.ollama.generate_timeout_secs * 1000)
            .with_tags_timeout(config.ollama.tags_timeout_secs * 1000);
        let backend: Arc<dyn LlmBackend> = Arc::new(OllamaBackend::new(client));
        Self::with_backend(config, backend)
    }

    /// Wiring with an explicit backend; tests pass a fake here.
    pub fn with_backend(config: &ReviewdConfig, backend: Arc<dyn LlmBackend>) -> Self {
        Self {
            orchestrator: ReviewOrchestrator::new(
                backend,
                config.ollama.default_model.clone(),
                config.gate.unclear_verdict,
            ),
            commits: Arc::new(InMemoryCommitStore::new()),
            subscriptions: Arc::new(InMemorySubscriptionStore::new()),
        }
    }
}

/// Build the full application router.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::models_routes())
        .merge(routes::review_routes())
        .merge(routes::hook_routes())
        .merge(routes::commit_routes())
        .merge(routes::subscription_routes())
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// Run the HTTP server until shutdown.
pub async fn run(config: ReviewdConfig) -> Result<()> {
    let body_limit = config.server.body_limit_bytes;
    let bind = config.server.bind.clone();
    let state = AppState::new(&config);
    let app = app(state, body_limit);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Listening on http://{}", bind);

    axum::serve(listener, app).await?;
    Ok(())
}
