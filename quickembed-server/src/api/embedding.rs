use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use quickembed_core::embedding::{BATCH_SEPARATOR, EmbedError, Embedder, join_batch};
use serde_json::Value;

use super::{AppState, BatchEmbeddingResponse, EmbeddingResponse, GatewayError, Result};

const MISSING_TEXT: &str = "Missing 'text' field";
const EMPTY_TEXT: &str = "Text cannot be empty";
const NO_EMBEDDING: &str = "Failed to generate embedding";

const MISSING_TEXTS: &str = "Missing 'texts' array field";
const EMPTY_TEXTS: &str = "Texts array cannot be empty";
const NO_EMBEDDINGS: &str = "Failed to generate embeddings";

/// `POST /embedding`: embed a single `text`.
pub async fn embed_single_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<EmbeddingResponse>> {
    let text = parse_text(&parse_json(&read_body(body)?)?)?;

    let embedding = run_backend(&state, move |embedder| embedder.embed_single(&text)).await?;
    if embedding.is_empty() {
        return Err(GatewayError::BackendFailure(NO_EMBEDDING));
    }

    tracing::debug!(dimension = embedding.len(), "generated embedding");
    Ok(Json(EmbeddingResponse {
        dimension: embedding.len(),
        embedding,
    }))
}

/// `POST /embedding/batch`: embed every entry of `texts` in one backend call.
///
/// The texts are joined with newlines and the backend returns one vector per
/// line. A text containing a newline therefore produces more vectors than
/// inputs; the request is forwarded unchanged and the mismatch is only logged.
pub async fn embed_batch_handler(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<BatchEmbeddingResponse>> {
    let texts = parse_texts(&parse_json(&read_body(body)?)?)?;

    if texts.iter().any(|t| t.contains(BATCH_SEPARATOR)) {
        tracing::warn!("batch input contains embedded newlines; vectors will not align with texts");
    }
    let expected = texts.len();
    let block = join_batch(&texts);

    let embeddings = run_backend(&state, move |embedder| embedder.embed_batch(&block)).await?;
    if embeddings.is_empty() {
        return Err(GatewayError::BackendFailure(NO_EMBEDDINGS));
    }
    if embeddings.len() != expected {
        tracing::warn!(
            expected,
            returned = embeddings.len(),
            "backend returned a different number of vectors than texts"
        );
    }

    let dimension = embeddings.first().map(Vec::len);
    tracing::debug!(count = embeddings.len(), ?dimension, "generated batch embeddings");
    Ok(Json(BatchEmbeddingResponse {
        count: embeddings.len(),
        dimension,
        embeddings,
    }))
}

/// An unreadable body cannot hold valid JSON.
fn read_body(body: std::result::Result<Bytes, BytesRejection>) -> Result<Bytes> {
    body.map_err(|e| {
        tracing::debug!(error = %e, "failed to read request body");
        GatewayError::InvalidJson
    })
}

fn parse_json(body: &[u8]) -> Result<Value> {
    serde_json::from_slice(body).map_err(|_| GatewayError::InvalidJson)
}

fn parse_text(request: &Value) -> Result<String> {
    let field = request
        .get("text")
        .ok_or(GatewayError::MissingField(MISSING_TEXT))?;
    let text = field.as_str().ok_or(GatewayError::InvalidJson)?;
    if text.is_empty() {
        return Err(GatewayError::EmptyInput(EMPTY_TEXT));
    }
    Ok(text.to_owned())
}

fn parse_texts(request: &Value) -> Result<Vec<String>> {
    let Some(items) = request.get("texts").and_then(Value::as_array) else {
        return Err(GatewayError::MissingField(MISSING_TEXTS));
    };
    let texts = items
        .iter()
        .map(|item| item.as_str().map(str::to_owned).ok_or(GatewayError::InvalidJson))
        .collect::<Result<Vec<_>>>()?;
    if texts.is_empty() {
        return Err(GatewayError::EmptyInput(EMPTY_TEXTS));
    }
    Ok(texts)
}

/// Run a backend call on the blocking pool.
async fn run_backend<T, F>(state: &AppState, job: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn Embedder) -> std::result::Result<T, EmbedError> + Send + 'static,
{
    let embedder = Arc::clone(&state.embedder);
    tokio::task::spawn_blocking(move || job(embedder.as_ref()))
        .await
        .map_err(|e| GatewayError::InternalError(format!("embedding task failed: {e}")))?
        .map_err(|e| GatewayError::InternalError(e.to_string()))
}
