//! Telnyx Call Control integration
//!
//! - `client` - async REST client for call-control actions
//! - `events` - webhook envelope parsing and event dispatch types
//! - `signature` - Ed25519 webhook signature verification
//! - `types` - request bodies sent to the Call Control API

mod client;
mod error;
pub mod events;
pub mod signature;
pub mod types;

pub use client::TelnyxClient;
pub use error::{TelnyxError, TelnyxResult};
pub use events::{CallEvent, EventError, WebhookEnvelope};
pub use signature::{SignatureError, WebhookVerifier};
