//! Webhook route configuration
//!
//! Telnyx posts call-control events here. The route sits outside any JSON
//! body parsing so the handler sees the raw bytes.

use axum::{Router, routing::post};
use tower_http::trace::TraceLayer;

use crate::handlers::telnyx_webhook;
use crate::state::AppState;
use std::sync::Arc;

/// Create the webhook router
///
/// # Endpoint
///
/// `POST /webhooks/telnyx` - Telnyx call-control event callback
pub fn create_webhook_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/webhooks/telnyx", post(telnyx_webhook))
        .layer(TraceLayer::new_for_http())
}
