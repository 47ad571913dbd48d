use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::telnyx::{EventError, SignatureError, TelnyxError};

/// Body returned for every rejected webhook, whatever the cause
pub const INVALID_WEBHOOK_MESSAGE: &str = "invalid signature";

/// Errors surfaced by HTTP handlers
///
/// Each variant maps to exactly one response shape:
/// - `Upstream` → 500 `{"error": <upstream body or message>}`
/// - `InvalidBody` → 400 `{"error": <decode message>}`
/// - `Signature` / `Event` → 400 `invalid signature` (text/plain)
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Upstream(#[from] TelnyxError),

    #[error("Invalid JSON request body: {0}")]
    InvalidBody(#[source] serde_json::Error),

    #[error("Webhook rejected: {0}")]
    Signature(#[from] SignatureError),

    #[error("Webhook rejected: {0}")]
    Event(#[from] EventError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidBody(_) | AppError::Signature(_) | AppError::Event(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::Upstream(err) => {
                (status, Json(json!({ "error": err.relay_payload() }))).into_response()
            }
            AppError::InvalidBody(err) => {
                (status, Json(json!({ "error": err.to_string() }))).into_response()
            }
            AppError::Signature(_) | AppError::Event(_) => {
                (status, INVALID_WEBHOOK_MESSAGE).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
