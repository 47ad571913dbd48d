//! Call-control gateway handlers
//!
//! Each handler forwards one local route to one Call Control action with the
//! server's credential attached. Upstream success bodies are relayed
//! byte-for-byte with status 200. Any upstream failure, whether a non-2xx
//! status or a transport error, becomes a 500 carrying the upstream error
//! payload (see [`crate::errors::AppError`]).
//!
//! Request bodies are decoded leniently: a body that is empty or not sent as
//! JSON counts as `{}`, and field values are forwarded without type checks.
//! Only syntactically broken JSON is rejected, with 400.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::errors::{AppError, AppResult};
use crate::state::AppState;
use crate::telnyx::TelnyxError;

/// Request body for `POST /api/calls`
///
/// # Example
/// ```json
/// { "to": "+15551234567" }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CreateCallBody {
    /// Destination number or SIP URI, forwarded unvalidated
    #[serde(default)]
    pub to: Option<Value>,
}

/// Request body for `POST /api/calls/{call_control_id}/dtmf`
#[derive(Debug, Default, Deserialize)]
pub struct SendDtmfBody {
    #[serde(default)]
    pub digits: Option<Value>,
}

/// Handler for `POST /api/calls`
///
/// Originates a call from the configured number and connection. The upstream
/// response contains the `call_control_id` callers need for every later action.
pub async fn create_call(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let body: CreateCallBody = json_body(&headers, &body)?;
    info!(to = ?body.to, "Create call request");

    let upstream = state
        .telnyx
        .create_call(body.to)
        .await
        .map_err(|e| upstream_failure("create_call", None, e))?;

    Ok(relay(upstream))
}

/// Handler for `POST /api/calls/{call_control_id}/dtmf`
pub async fn send_dtmf(
    State(state): State<Arc<AppState>>,
    Path(call_control_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Response> {
    let body: SendDtmfBody = json_body(&headers, &body)?;
    info!(call_control_id = %call_control_id, digits = ?body.digits, "Send DTMF request");

    let upstream = state
        .telnyx
        .send_dtmf(&call_control_id, body.digits)
        .await
        .map_err(|e| upstream_failure("send_dtmf", Some(&call_control_id), e))?;

    Ok(relay(upstream))
}

/// Handler for `POST /api/calls/{call_control_id}/record/start`
pub async fn record_start(
    State(state): State<Arc<AppState>>,
    Path(call_control_id): Path<String>,
) -> AppResult<Response> {
    info!(call_control_id = %call_control_id, "Start recording request");

    let upstream = state
        .telnyx
        .record_start(&call_control_id)
        .await
        .map_err(|e| upstream_failure("record_start", Some(&call_control_id), e))?;

    Ok(relay(upstream))
}

/// Handler for `POST /api/calls/{call_control_id}/record/stop`
pub async fn record_stop(
    State(state): State<Arc<AppState>>,
    Path(call_control_id): Path<String>,
) -> AppResult<Response> {
    info!(call_control_id = %call_control_id, "Stop recording request");

    let upstream = state
        .telnyx
        .record_stop(&call_control_id)
        .await
        .map_err(|e| upstream_failure("record_stop", Some(&call_control_id), e))?;

    Ok(relay(upstream))
}

/// Handler for `POST /api/calls/{call_control_id}/hangup`
pub async fn hangup(
    State(state): State<Arc<AppState>>,
    Path(call_control_id): Path<String>,
) -> AppResult<Response> {
    info!(call_control_id = %call_control_id, "Hangup request");

    let upstream = state
        .telnyx
        .hangup(&call_control_id)
        .await
        .map_err(|e| upstream_failure("hangup", Some(&call_control_id), e))?;

    Ok(relay(upstream))
}

fn json_body<T: DeserializeOwned + Default>(headers: &HeaderMap, body: &[u8]) -> AppResult<T> {
    if body.is_empty() || !is_json_content_type(headers) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(AppError::InvalidBody)
}

/// `application/json` or any `application/*+json`, parameters ignored
fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json"
                || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false)
}

/// Pass an upstream success body through unchanged
fn relay(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

fn upstream_failure(action: &str, call_control_id: Option<&str>, err: TelnyxError) -> AppError {
    error!(
        action = %action,
        call_control_id = ?call_control_id,
        error = %err,
        "Telnyx action failed"
    );
    AppError::Upstream(err)
}
