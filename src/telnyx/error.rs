use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Errors returned by [`super::TelnyxClient`]
#[derive(Debug, Error)]
pub enum TelnyxError {
    /// The API answered with a non-2xx status
    #[error("Telnyx API returned {status}: {body}")]
    Status { status: StatusCode, body: Value },

    /// The request never produced a response (connect, TLS, timeout, body read)
    #[error("Telnyx request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid Telnyx API URL: {0}")]
    InvalidUrl(String),
}

impl TelnyxError {
    /// The payload relayed to local callers in the `error` field.
    ///
    /// Upstream error bodies are passed through as-is; everything else is
    /// reported as its message string.
    pub fn relay_payload(&self) -> Value {
        match self {
            TelnyxError::Status { body, .. } => body.clone(),
            other => Value::String(other.to_string()),
        }
    }
}

pub type TelnyxResult<T> = Result<T, TelnyxError>;
