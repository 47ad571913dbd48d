//! Telnyx webhook receiver
//!
//! Takes the raw body so the signature (when configured) is checked against
//! the exact bytes Telnyx signed, then decodes and dispatches the event.
//! Reactions never delay the acknowledgement: the `call.answered` transfer is
//! spawned and only its outcome is logged.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::errors::AppResult;
use crate::state::AppState;
use crate::telnyx::{CallEvent, WebhookEnvelope};

/// Handler for `POST /webhooks/telnyx`
///
/// # Returns
/// * 200 `ok` once the event is accepted, whatever any follow-up action does
/// * 400 `invalid signature` if the signature check, JSON decoding, or
///   payload extraction fails. The event is dropped.
pub async fn telnyx_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    debug!(bytes = body.len(), "Telnyx webhook received");

    match handle_webhook(&state, &headers, &body) {
        Ok(event) => {
            dispatch(&state, event);
            (StatusCode::OK, "ok").into_response()
        }
        Err(e) => {
            warn!(error = %e, "Rejecting Telnyx webhook");
            e.into_response()
        }
    }
}

fn handle_webhook(state: &AppState, headers: &HeaderMap, body: &[u8]) -> AppResult<CallEvent> {
    if let Some(verifier) = &state.webhook_verifier {
        verifier.verify(headers, body)?;
    }

    let envelope = WebhookEnvelope::parse(body)?;
    info!(
        event_type = %envelope.data.event_type_name(),
        payload = %envelope.data.payload,
        "Webhook event"
    );

    Ok(CallEvent::try_from(&envelope.data)?)
}

fn dispatch(state: &Arc<AppState>, event: CallEvent) {
    debug!(event_type = %event.event_type(), "Dispatching webhook event");

    match event {
        CallEvent::Answered { call_control_id } => {
            spawn_transfer(state.clone(), call_control_id);
        }
        CallEvent::DtmfReceived {
            call_control_id,
            digit,
        } => {
            info!(call_control_id = ?call_control_id, digit = ?digit, "DTMF received");
        }
        CallEvent::Other { .. } => {}
    }
}

/// Transfer an answered call to the configured destination in the background
fn spawn_transfer(state: Arc<AppState>, call_control_id: String) {
    tokio::spawn(async move {
        let destination = &state.config.transfer_destination;
        match state.telnyx.transfer(&call_control_id, destination).await {
            Ok(_) => info!(
                call_control_id = %call_control_id,
                to = %destination,
                "Call transfer issued"
            ),
            Err(e) => error!(
                call_control_id = %call_control_id,
                to = %destination,
                error = %e,
                "Call transfer failed"
            ),
        }
    });
}
