use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;
use zeroize::Zeroizing;

use super::error::{TelnyxError, TelnyxResult};
use super::types::{
    CreateCallRequest, EmptyAction, RecordStartRequest, SendDtmfRequest, TransferRequest,
};
use crate::config::ServerConfig;

/// Client for the Telnyx Call Control REST API
///
/// Every request is a `POST` with a JSON body and the configured bearer
/// credential. Successful responses are returned as raw body bytes so callers
/// can relay them unchanged. The client holds no per-call state and is cheap
/// to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct TelnyxClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Zeroizing<String>,
    from_number: String,
    connection_id: String,
}

impl std::fmt::Debug for TelnyxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelnyxClient")
            .field("base_url", &self.base_url.as_str())
            .field("from_number", &self.from_number)
            .field("connection_id", &self.connection_id)
            .finish_non_exhaustive()
    }
}

impl TelnyxClient {
    /// Build a client from the server configuration
    pub fn new(config: &ServerConfig) -> TelnyxResult<Self> {
        let base_url = Url::parse(&config.telnyx_api_base_url)
            .map_err(|e| TelnyxError::InvalidUrl(format!("{}: {e}", config.telnyx_api_base_url)))?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.telnyx_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            api_key: Zeroizing::new(config.telnyx_api_key.clone()),
            from_number: config.telnyx_from_number.clone(),
            connection_id: config.telnyx_connection_id.clone(),
        })
    }

    /// Originate an outbound call from the configured number and connection
    pub async fn create_call(&self, to: Option<Value>) -> TelnyxResult<Bytes> {
        let url = self.url(&["calls"])?;
        let body = CreateCallRequest {
            to,
            from: self.from_number.clone(),
            connection_id: self.connection_id.clone(),
        };
        self.post(url, &body).await
    }

    /// Play DTMF tones on an active call
    pub async fn send_dtmf(
        &self,
        call_control_id: &str,
        digits: Option<Value>,
    ) -> TelnyxResult<Bytes> {
        self.action(call_control_id, "send_dtmf", &SendDtmfRequest { digits })
            .await
    }

    /// Start recording as single-channel mp3
    pub async fn record_start(&self, call_control_id: &str) -> TelnyxResult<Bytes> {
        self.action(call_control_id, "record_start", &RecordStartRequest::default())
            .await
    }

    pub async fn record_stop(&self, call_control_id: &str) -> TelnyxResult<Bytes> {
        self.action(call_control_id, "record_stop", &EmptyAction {})
            .await
    }

    pub async fn hangup(&self, call_control_id: &str) -> TelnyxResult<Bytes> {
        self.action(call_control_id, "hangup", &EmptyAction {}).await
    }

    /// Transfer an active call to another number or SIP URI
    pub async fn transfer(&self, call_control_id: &str, to: &str) -> TelnyxResult<Bytes> {
        let body = TransferRequest { to: to.to_string() };
        self.action(call_control_id, "transfer", &body).await
    }

    async fn action<B: Serialize + ?Sized>(
        &self,
        call_control_id: &str,
        action: &str,
        body: &B,
    ) -> TelnyxResult<Bytes> {
        let url = self.url(&["calls", call_control_id, "actions", action])?;
        self.post(url, body).await
    }

    /// Append path segments to the base URL. Segments are percent-encoded,
    /// so an identifier can never escape its position in the path.
    fn url(&self, segments: &[&str]) -> TelnyxResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TelnyxError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> TelnyxResult<Bytes> {
        debug!(url = %url, "Sending Telnyx request");

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(self.api_key.as_str())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            debug!(url = %url, status = %status, "Telnyx request succeeded");
            return Ok(bytes);
        }

        let body = serde_json::from_slice::<Value>(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        Err(TelnyxError::Status { status, body })
    }
}
