//! HTTP API layer for quickembed.
//!
//! Three routes: `GET /health`, `POST /embedding` and `POST /embedding/batch`.
//! Every response body is JSON; failures use the `{"error": "..."}` shape from
//! [`ErrorResponse`] and never carry a machine-readable code, so clients tell
//! error classes apart by status code and message.

mod embedding;
mod error;

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use quickembed_core::embedding::Embedder;
use serde::{Deserialize, Serialize};

use crate::cors::with_cors;

pub use embedding::{embed_batch_handler, embed_single_handler};
pub use error::{ErrorResponse, GatewayError, Result};

// ── Shared types ────────────────────────────────────────────────────────

/// Response body for `POST /embedding`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingResponse {
    pub embedding: Vec<f32>,
    pub dimension: usize,
}

/// Response body for `POST /embedding/batch`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchEmbeddingResponse {
    pub embeddings: Vec<Vec<f32>>,
    pub count: usize,
    /// Length of the first vector; absent when there are no vectors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<usize>,
}

/// Response body for `GET /health`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

/// Shared application state.
///
/// Built once at startup and never mutated; handlers only read the backend
/// handle.
pub struct AppState {
    pub embedder: Arc<dyn Embedder>,
}

/// Build the full application router, CORS included.
///
/// Request bodies are not size-limited; large batches reach the handlers.
pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/health", get(health_handler))
        .route("/embedding", post(embed_single_handler))
        .route("/embedding/batch", post(embed_batch_handler))
        .layer(DefaultBodyLimit::disable())
        .with_state(state);
    with_cors(routes)
}

/// `GET /health`: liveness probe.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
    })
}
