//! Request bodies for the Call Control API
//!
//! Caller-supplied values (`to`, `digits`) are carried as raw JSON and
//! forwarded unchanged. Telnyx validates them.

use serde::Serialize;
use serde_json::Value;

/// `POST /calls`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateCallRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Value>,
    pub from: String,
    pub connection_id: String,
}

/// `POST /calls/{id}/actions/send_dtmf`
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SendDtmfRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digits: Option<Value>,
}

/// `POST /calls/{id}/actions/record_start`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RecordStartRequest {
    pub format: RecordingFormat,
    pub channels: RecordingChannels,
}

impl Default for RecordStartRequest {
    fn default() -> Self {
        Self {
            format: RecordingFormat::Mp3,
            channels: RecordingChannels::Single,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordingFormat {
    Mp3,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecordingChannels {
    Single,
}

/// `POST /calls/{id}/actions/transfer`
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TransferRequest {
    pub to: String,
}

/// Body for actions that take no parameters (`record_stop`, `hangup`)
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct EmptyAction {}
