use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Request failures, each with a fixed status code and client-facing message.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Body is not valid JSON, or a field has the wrong JSON type
    #[error("Invalid JSON format")]
    InvalidJson,

    /// Required field absent
    #[error("{0}")]
    MissingField(&'static str),

    /// Required field present but empty
    #[error("{0}")]
    EmptyInput(&'static str),

    /// Backend returned no data
    #[error("{0}")]
    BackendFailure(&'static str),

    /// Backend raised an error. The detail is logged, never sent to clients.
    #[error("Internal server error")]
    InternalError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidJson | Self::MissingField(_) | Self::EmptyInput(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::BackendFailure(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error body: `{"error": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            Self::InternalError(detail) => tracing::error!(%detail, "embedding request failed"),
            Self::BackendFailure(_) => tracing::warn!("embedding backend returned no data"),
            _ => tracing::debug!(error = %self, "rejected embedding request"),
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
