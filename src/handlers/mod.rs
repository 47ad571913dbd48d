//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `calls` - Call-control gateway forwarding to the Telnyx API
//! - `webhooks` - Telnyx webhook receiver

pub mod api;
pub mod calls;
pub mod webhooks;

pub use webhooks::telnyx_webhook;
