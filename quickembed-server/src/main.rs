use std::sync::Arc;

use quickembed_core::embedding::{Embedder, LocalEmbedder};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod api;
mod config;
mod cors;

use api::AppState;
use config::Config;

const ENDPOINTS: &[&str] = &["GET  /health", "POST /embedding", "POST /embedding/batch"];

#[tokio::main]
async fn main() {
    let config = Config::load();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let embedder = LocalEmbedder::new(&config.embedding).unwrap_or_else(|e| {
        tracing::error!("failed to initialise embedding backend: {e}");
        std::process::exit(1);
    });
    let model = embedder.model_name().to_string();
    let provider = embedder.provider_type().to_string();
    let dimensions = embedder.dimensions();

    let state = Arc::new(AppState {
        embedder: Arc::new(embedder),
    });
    let app = api::router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("failed to start server on {addr}: {e}");
            std::process::exit(1);
        });

    tracing::info!(
        address = %addr,
        provider = %provider,
        model = %model,
        dimensions,
        "starting embedding server"
    );
    for endpoint in ENDPOINTS {
        tracing::info!("  {endpoint}");
    }

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }

    tracing::info!("embedding server stopped");
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
