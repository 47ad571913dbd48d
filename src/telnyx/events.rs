//! Webhook event parsing
//!
//! Telnyx delivers call-control events wrapped in an envelope:
//!
//! ```json
//! {
//!   "data": {
//!     "event_type": "call.answered",
//!     "payload": { "call_control_id": "v3:abc123", "...": "..." }
//!   }
//! }
//! ```
//!
//! [`WebhookEnvelope::parse`] decodes the raw bytes and [`CallEvent`] narrows
//! the event into the closed set of types this service reacts to. Anything
//! else becomes [`CallEvent::Other`] and is acknowledged without action.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

pub const CALL_ANSWERED: &str = "call.answered";
pub const CALL_DTMF_RECEIVED: &str = "call.dtmf.received";

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Webhook body is not a valid event envelope: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),

    #[error("Invalid payload for {event_type}: {source}")]
    InvalidPayload {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Outer webhook body
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    pub data: EventData,
}

/// `data` member of the envelope
///
/// Both fields are kept as raw JSON. An absent or non-string `event_type`
/// is acknowledged like any other event without a reaction.
#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    #[serde(default)]
    pub event_type: Value,
    #[serde(default)]
    pub payload: Value,
}

impl EventData {
    /// Event type as text, JSON-encoded when it is not a string
    pub fn event_type_name(&self) -> String {
        match &self.event_type {
            Value::String(name) => name.clone(),
            other => other.to_string(),
        }
    }
}

impl WebhookEnvelope {
    pub fn parse(body: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(body).map_err(EventError::InvalidEnvelope)
    }
}

#[derive(Debug, Deserialize)]
struct AnsweredPayload {
    call_control_id: String,
}

/// Events the webhook receiver knows how to react to
#[derive(Debug, Clone, PartialEq)]
pub enum CallEvent {
    /// The far end picked up
    Answered { call_control_id: String },
    /// A caller pressed a key. Only logged, so the fields stay untyped.
    DtmfReceived {
        call_control_id: Option<Value>,
        digit: Option<Value>,
    },
    /// Any event type without a reaction
    Other { event_type: String },
}

impl CallEvent {
    pub fn event_type(&self) -> &str {
        match self {
            CallEvent::Answered { .. } => CALL_ANSWERED,
            CallEvent::DtmfReceived { .. } => CALL_DTMF_RECEIVED,
            CallEvent::Other { event_type } => event_type,
        }
    }
}

impl TryFrom<&EventData> for CallEvent {
    type Error = EventError;

    fn try_from(data: &EventData) -> Result<Self, Self::Error> {
        match data.event_type.as_str() {
            Some(CALL_ANSWERED) => {
                let payload: AnsweredPayload = serde_json::from_value(data.payload.clone())
                    .map_err(|source| EventError::InvalidPayload {
                        event_type: CALL_ANSWERED.to_string(),
                        source,
                    })?;
                Ok(CallEvent::Answered {
                    call_control_id: payload.call_control_id,
                })
            }
            Some(CALL_DTMF_RECEIVED) => Ok(CallEvent::DtmfReceived {
                call_control_id: payload_field(&data.payload, "call_control_id"),
                digit: payload_field(&data.payload, "digit"),
            }),
            _ => Ok(CallEvent::Other {
                event_type: data.event_type_name(),
            }),
        }
    }
}

fn payload_field(payload: &Value, name: &str) -> Option<Value> {
    payload.get(name).filter(|value| !value.is_null()).cloned()
}
