//! Webhook signature verification
//!
//! Telnyx signs each webhook with Ed25519. The signed message is the
//! `telnyx-timestamp` header value, a `|` separator, and the raw request
//! body, byte for byte. Verification therefore has to run on the body before
//! any JSON decoding.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use http::HeaderMap;
use thiserror::Error;

pub const SIGNATURE_HEADER: &str = "telnyx-signature-ed25519";
pub const TIMESTAMP_HEADER: &str = "telnyx-timestamp";

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("Missing {0} header")]
    MissingHeader(&'static str),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Timestamp outside tolerance ({age_seconds}s old, {tolerance_seconds}s allowed)")]
    StaleTimestamp {
        age_seconds: u64,
        tolerance_seconds: u64,
    },

    #[error("Signature does not match payload")]
    Mismatch,
}

/// Verifies `telnyx-signature-ed25519` headers against a portal public key
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    key: VerifyingKey,
    tolerance: Duration,
}

impl WebhookVerifier {
    /// Build a verifier from the base64 public key shown in the Telnyx portal
    pub fn from_base64(public_key: &str, tolerance_seconds: u64) -> Result<Self, SignatureError> {
        let bytes = STANDARD
            .decode(public_key.trim())
            .map_err(|e| SignatureError::InvalidPublicKey(e.to_string()))?;
        let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            SignatureError::InvalidPublicKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        let key = VerifyingKey::from_bytes(&bytes)
            .map_err(|e| SignatureError::InvalidPublicKey(e.to_string()))?;

        Ok(Self {
            key,
            tolerance: Duration::from_secs(tolerance_seconds),
        })
    }

    /// Verify a webhook against the current wall clock
    pub fn verify(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), SignatureError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        self.verify_at(headers, body, now)
    }

    pub(crate) fn verify_at(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        now: u64,
    ) -> Result<(), SignatureError> {
        let signature = header_str(headers, SIGNATURE_HEADER)?;
        let timestamp = header_str(headers, TIMESTAMP_HEADER)?;

        let sent_at: u64 = timestamp
            .trim()
            .parse()
            .map_err(|_| SignatureError::MalformedTimestamp(timestamp.to_string()))?;
        let age_seconds = now.abs_diff(sent_at);
        if age_seconds > self.tolerance.as_secs() {
            return Err(SignatureError::StaleTimestamp {
                age_seconds,
                tolerance_seconds: self.tolerance.as_secs(),
            });
        }

        let signature_bytes = STANDARD
            .decode(signature.trim())
            .map_err(|e| SignatureError::MalformedSignature(e.to_string()))?;
        let signature = Signature::from_slice(&signature_bytes)
            .map_err(|e| SignatureError::MalformedSignature(e.to_string()))?;

        let mut message = Vec::with_capacity(timestamp.len() + 1 + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.push(b'|');
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| SignatureError::Mismatch)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, SignatureError> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .ok_or(SignatureError::MissingHeader(name))
}
